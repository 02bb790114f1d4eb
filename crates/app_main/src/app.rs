//! Application main loop

use anyhow::Result;
use app_core::{
    relative_time, ActionDispatcher, AppConfig, Delivery, LoadState, LoadedImage, Reply, UserAction,
    ViewerImage, ViewerState,
};
use app_ui::{
    components::{
        ContextMenuAction, ContextMenuView, GridAction, GridCell, ImageModal, ModalAction,
        ModalCaption, ModalContent, NoticeDialog, StatusBar, StatusInfo, ThumbnailGrid, Toolbar,
        ToolbarAction, ToolbarInfo,
    },
    FrameOutput, InputHandler, Renderer, Theme,
};
use crossbeam_channel::Receiver;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

/// How often the loop wakes to look for server replies while idle
const REPLY_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Main application state for the event loop
struct App {
    window: Option<Arc<Window>>,
    renderer: Option<Renderer>,
    egui_ctx: egui::Context,
    egui_state: Option<egui_winit::State>,

    config: AppConfig,
    theme: Theme,
    input_handler: InputHandler,

    // Gallery
    state: ViewerState,
    dispatcher: ActionDispatcher,
    replies: Receiver<Reply>,

    // UI Components
    grid: ThumbnailGrid,
    modal: ImageModal,
    notices: NoticeDialog,

    // Textures of the current catalog generation
    thumbnails: HashMap<usize, egui::TextureHandle>,
    viewer_texture: Option<(usize, egui::TextureHandle)>,
    texture_generation: u64,

    repaint_now: bool,
}

impl App {
    fn new(config: AppConfig, dispatcher: ActionDispatcher, replies: Receiver<Reply>) -> Self {
        let state = ViewerState::new(&config.gallery);
        let grid = ThumbnailGrid::new(
            config.gallery.thumbnail_size as f32,
            config.gallery.root_margin_px,
        );

        Self {
            window: None,
            renderer: None,
            egui_ctx: egui::Context::default(),
            egui_state: None,

            theme: Theme::by_name(&config.general.theme),
            input_handler: InputHandler::new(config.keybindings.clone()),
            config,

            texture_generation: state.gallery.generation(),
            state,
            dispatcher,
            replies,

            grid,
            modal: ImageModal::new(),
            notices: NoticeDialog::new(),

            thumbnails: HashMap::new(),
            viewer_texture: None,

            repaint_now: true,
        }
    }

    fn init_window(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let window_attrs = Window::default_attributes()
            .with_title("Cache Viewer")
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.config.general.window_width,
                self.config.general.window_height,
            ));

        let window = Arc::new(event_loop.create_window(window_attrs)?);

        let renderer = pollster::block_on(Renderer::new(window.clone()))?;

        let egui_state = egui_winit::State::new(
            self.egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );

        self.theme.apply(&self.egui_ctx);

        self.window = Some(window);
        self.renderer = Some(renderer);
        self.egui_state = Some(egui_state);

        // Initial catalog load
        self.dispatch(UserAction::Refresh);

        Ok(())
    }

    fn dispatch(&mut self, action: UserAction) {
        self.dispatcher.handle(action, &mut self.state);
        self.repaint_now = true;
    }

    /// Apply every reply that arrived since the last frame
    fn drain_replies(&mut self) {
        while let Ok(reply) = self.replies.try_recv() {
            let delivery = self.dispatcher.on_reply(reply, &mut self.state);
            self.sync_texture_generation();

            match delivery {
                Some(Delivery::Thumbnail { index, image }) => {
                    let texture = self.upload(&image);
                    self.thumbnails.insert(index, texture);
                }
                Some(Delivery::Viewer { index, image }) => {
                    let texture = self.upload(&image);
                    self.viewer_texture = Some((index, texture));
                }
                None => {}
            }
            self.repaint_now = true;
        }

        self.notices.extend(self.dispatcher.take_notices());
    }

    /// Drop textures belonging to a replaced catalog
    fn sync_texture_generation(&mut self) {
        let generation = self.state.gallery.generation();
        if generation != self.texture_generation {
            tracing::debug!(
                "Catalog generation {} -> {}, dropping {} thumbnails",
                self.texture_generation,
                generation,
                self.thumbnails.len()
            );
            self.thumbnails.clear();
            self.viewer_texture = None;
            self.texture_generation = generation;
        }
    }

    fn upload(&self, image: &LoadedImage) -> egui::TextureHandle {
        let color_image = egui::ColorImage::from_rgba_unmultiplied(
            [image.width as usize, image.height as usize],
            &image.data,
        );
        self.egui_ctx
            .load_texture(&image.name, color_image, egui::TextureOptions::LINEAR)
    }

    fn render(&mut self) {
        self.drain_replies();

        let window = match &self.window {
            Some(w) => w.clone(),
            None => return,
        };

        let raw_input = match &mut self.egui_state {
            Some(s) => s.take_egui_input(&window),
            None => return,
        };

        let now = chrono::Utc::now();
        let state = &self.state;
        let dispatcher = &self.dispatcher;
        let theme = &self.theme;
        let grid = &self.grid;
        let thumbnails = &self.thumbnails;
        let viewer_texture = &self.viewer_texture;
        let modal = &mut self.modal;
        let notices = &mut self.notices;
        let blocked = notices.is_open();

        let mut menu_actions: Vec<UserAction> = Vec::new();
        let mut actions: Vec<UserAction> = Vec::new();
        let mut laid_out = Vec::new();
        let mut viewport = None;

        let status = StatusInfo {
            server: self.config.server.base_url.clone(),
            highlighted: state
                .gallery
                .highlighted_index()
                .and_then(|i| state.gallery.catalog().get(i))
                .map(|e| e.name.clone()),
            loading: state.thumbnails.in_flight(),
            failed: state.thumbnails.count(LoadState::Failed),
        };

        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
                let info = ToolbarInfo {
                    total_files: state.summary.count,
                    total_size: state.summary.total_size_label(),
                    delete_all_in_flight: dispatcher.is_delete_all_in_flight(),
                };
                match Toolbar::ui(ui, &info) {
                    Some(ToolbarAction::Refresh) => actions.push(UserAction::Refresh),
                    Some(ToolbarAction::DeleteAll) => actions.push(UserAction::DeleteAll),
                    None => {}
                }
            });

            egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
                StatusBar::ui(ui, &status);
            });

            egui::CentralPanel::default().show(ctx, |ui| {
                let catalog = state.gallery.catalog();
                let output = grid.ui(ui, theme, catalog.len(), |index| {
                    let entry = catalog.get(index)?;
                    Some(GridCell {
                        name: &entry.name,
                        size_label: &entry.size_label,
                        age: entry
                            .modified
                            .map(|then| relative_time(then, now))
                            .unwrap_or_default(),
                        state: state.thumbnails.state(index).unwrap_or(LoadState::Placeholder),
                        texture: thumbnails.get(&index),
                        highlighted: state.gallery.is_highlighted(index),
                    })
                });

                match output.action {
                    Some(GridAction::Open(index)) => actions.push(UserAction::PrimaryClick(index)),
                    Some(GridAction::ContextMenu { index, pos }) => {
                        actions.push(UserAction::SecondaryClick { index, x: pos.x, y: pos.y })
                    }
                    None => {}
                }
                laid_out = output.laid_out;
                viewport = output.viewport;
            });

            if let Some(menu) = dispatcher.context_menu() {
                let anchor = egui::pos2(menu.anchor.0, menu.anchor.1);
                match ContextMenuView::ui(ctx, anchor, &menu.target.name) {
                    Some(ContextMenuAction::OpenInExplorer) => menu_actions.push(UserAction::OpenTargetInExplorer),
                    Some(ContextMenuAction::Delete) => menu_actions.push(UserAction::DeleteTarget),
                    Some(ContextMenuAction::Dismiss) => menu_actions.push(UserAction::DismissContextMenu),
                    None => {}
                }
            }

            if state.gallery.is_modal_open() {
                if let (Some(index), Some(entry)) =
                    (state.gallery.active_index(), state.gallery.active_entry())
                {
                    let content = match (state.viewer_is_current(), state.viewer, viewer_texture) {
                        (true, ViewerImage::Ready { .. }, Some((shown, texture))) if *shown == index => {
                            ModalContent::Ready(texture)
                        }
                        (true, ViewerImage::Failed { .. }, _) => ModalContent::Failed,
                        _ => ModalContent::Loading,
                    };
                    let caption = ModalCaption {
                        name: &entry.name,
                        position: index + 1,
                        total: state.gallery.catalog().len(),
                        size_label: &entry.size_label,
                    };
                    match modal.ui(ctx, theme, content, &caption) {
                        Some(ModalAction::Next) => actions.push(UserAction::ModalNext),
                        Some(ModalAction::Prev) => actions.push(UserAction::ModalPrev),
                        Some(ModalAction::Close) => actions.push(UserAction::CloseModal),
                        None => {}
                    }
                }
            }

            if let Some(notice) = notices.ui(ctx, theme) {
                tracing::debug!("Notice acknowledged: {}", notice.message);
            }
        });

        // Nothing behind an open notice reacts to input
        if blocked {
            menu_actions.clear();
            actions.clear();
        }

        // Menu outcomes first so a click that dismisses one menu can open another
        for action in menu_actions.into_iter().chain(actions) {
            self.dispatch(action);
        }

        if let Some(viewport) = viewport {
            for (index, bounds) in &laid_out {
                self.dispatcher
                    .observe_thumbnail(&mut self.state, *index, bounds, &viewport);
            }
        }

        if let Some(egui_state) = &mut self.egui_state {
            egui_state.handle_platform_output(&window, full_output.platform_output);
        }

        self.repaint_now = full_output
            .viewport_output
            .get(&egui::ViewportId::ROOT)
            .map_or(false, |v| v.repaint_delay.is_zero());

        let primitives = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        let renderer = match &mut self.renderer {
            Some(r) => r,
            None => return,
        };

        let frame = FrameOutput {
            primitives: &primitives,
            textures_delta: &full_output.textures_delta,
            pixels_per_point: full_output.pixels_per_point,
            clear_color: self.theme.clear_color(),
        };

        match renderer.render(frame) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => renderer.reconfigure(),
            Err(e) => tracing::error!("Surface error: {:?}", e),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.init_window(event_loop) {
                tracing::error!("Failed to initialize window: {}", e);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        // Let egui handle the event first
        if let (Some(egui_state), Some(window)) = (&mut self.egui_state, &self.window) {
            let response = egui_state.on_window_event(window, &event);
            if response.repaint {
                self.repaint_now = true;
            }
            if response.consumed {
                window.request_redraw();
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                tracing::info!("Close requested");
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if let Some(renderer) = &mut self.renderer {
                    renderer.resize((size.width, size.height));
                }
                self.repaint_now = true;
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if self.notices.is_open() {
                    return;
                }
                if let Some(cmd) = self.input_handler.handle_key(&event) {
                    if cmd.is_exit() {
                        event_loop.exit();
                        return;
                    }
                    match cmd.to_action() {
                        Some(action) => self.dispatch(action),
                        None => tracing::debug!("Unhandled command: {}", cmd.id.as_str()),
                    }
                }
            }

            WindowEvent::MouseInput { state, button, .. } => {
                if self.notices.is_open() {
                    return;
                }
                if let Some(action) = self
                    .input_handler
                    .handle_mouse_button(button, state)
                    .and_then(|cmd| cmd.to_action())
                {
                    self.dispatch(action);
                }
            }

            WindowEvent::ModifiersChanged(modifiers) => {
                self.input_handler.update_modifiers(modifiers.state());
            }

            WindowEvent::RedrawRequested => {
                self.render();
            }

            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.repaint_now || !self.replies.is_empty() {
            if let Some(window) = &self.window {
                window.request_redraw();
            }
        }
        event_loop.set_control_flow(ControlFlow::WaitUntil(Instant::now() + REPLY_POLL_INTERVAL));
    }
}

/// Run the application
pub fn run(config: AppConfig, dispatcher: ActionDispatcher, replies: Receiver<Reply>) -> Result<()> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new(config, dispatcher, replies);
    event_loop.run_app(&mut app)?;

    Ok(())
}
