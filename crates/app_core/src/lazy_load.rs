//! Deferred thumbnail loading driven by viewport intersection

use crate::config::GalleryConfig;

/// Load state of one grid entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// Skeleton shown, nothing requested
    Placeholder,
    /// Fetch issued
    Pending,
    /// Thumbnail decoded and shown
    Loaded,
    /// Fetch or decode failed; not retried
    Failed,
}

/// Axis-aligned rectangle in screen points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl Bounds {
    pub fn new(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Self {
        Self { min_x, min_y, max_x, max_y }
    }

    pub fn width(&self) -> f32 {
        (self.max_x - self.min_x).max(0.0)
    }

    pub fn height(&self) -> f32 {
        (self.max_y - self.min_y).max(0.0)
    }

    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    pub fn intersect(&self, other: &Bounds) -> Option<Bounds> {
        let b = Bounds::new(
            self.min_x.max(other.min_x),
            self.min_y.max(other.min_y),
            self.max_x.min(other.max_x),
            self.max_y.min(other.max_y),
        );
        (b.min_x <= b.max_x && b.min_y <= b.max_y).then_some(b)
    }

    /// Grow the bottom edge by `margin`
    pub fn extend_bottom(&self, margin: f32) -> Bounds {
        Bounds::new(self.min_x, self.min_y, self.max_x, self.max_y + margin)
    }
}

/// Handle for one issued thumbnail fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: u64,
    pub index: usize,
}

/// Intersection parameters
#[derive(Debug, Clone, Copy)]
pub struct ObserverConfig {
    pub root_margin_bottom: f32,
    pub threshold: f32,
    pub max_in_flight: usize,
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self::from(&GalleryConfig::default())
    }
}

impl From<&GalleryConfig> for ObserverConfig {
    fn from(config: &GalleryConfig) -> Self {
        Self {
            root_margin_bottom: config.root_margin_px,
            threshold: config.visibility_threshold,
            max_in_flight: config.max_concurrent_fetches.max(1),
        }
    }
}

/// Per-entry lazy load state machine for one catalog generation
#[derive(Debug)]
pub struct LazyLoader {
    config: ObserverConfig,
    generation: u64,
    states: Vec<LoadState>,
    /// Fetches not yet completed, across all generations
    in_flight: usize,
}

impl LazyLoader {
    pub fn new(config: ObserverConfig) -> Self {
        Self {
            config,
            generation: 0,
            states: Vec::new(),
            in_flight: 0,
        }
    }

    /// Start over with `len` placeholders for a new catalog generation.
    ///
    /// Fetches issued for earlier generations keep counting against the cap
    /// until their completions arrive.
    pub fn reset(&mut self, generation: u64, len: usize) {
        self.generation = generation;
        self.states = vec![LoadState::Placeholder; len];
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn state(&self, index: usize) -> Option<LoadState> {
        self.states.get(index).copied()
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn count(&self, state: LoadState) -> usize {
        self.states.iter().filter(|s| **s == state).count()
    }

    /// Whether an item is close enough to the viewport to be fetched
    pub fn is_intersecting(&self, item: &Bounds, viewport: &Bounds) -> bool {
        let root = viewport.extend_bottom(self.config.root_margin_bottom);
        let Some(overlap) = item.intersect(&root) else {
            return false;
        };

        let area = item.area();
        if area <= 0.0 {
            return true;
        }
        overlap.area() / area >= self.config.threshold
    }

    /// Report where a placeholder is drawn this frame.
    ///
    /// Returns a ticket when the entry moves to `Pending`; the caller must
    /// issue exactly one fetch for it. Entries past `Placeholder` are no
    /// longer observed.
    pub fn observe(&mut self, index: usize, item: &Bounds, viewport: &Bounds) -> Option<FetchTicket> {
        if self.states.get(index) != Some(&LoadState::Placeholder) {
            return None;
        }
        if self.in_flight >= self.config.max_in_flight {
            return None;
        }
        if !self.is_intersecting(item, viewport) {
            return None;
        }

        self.states[index] = LoadState::Pending;
        self.in_flight += 1;

        Some(FetchTicket {
            generation: self.generation,
            index,
        })
    }

    /// Record the outcome of a fetch. Returns false for stale or unknown tickets.
    ///
    /// Every ticket completes exactly once, so a stale completion still frees
    /// its slot.
    pub fn complete(&mut self, ticket: FetchTicket, success: bool) -> bool {
        if ticket.generation != self.generation {
            tracing::debug!("Dropping thumbnail from generation {}", ticket.generation);
            self.in_flight = self.in_flight.saturating_sub(1);
            return false;
        }
        match self.states.get_mut(ticket.index) {
            Some(state) if *state == LoadState::Pending => {
                *state = if success { LoadState::Loaded } else { LoadState::Failed };
                self.in_flight = self.in_flight.saturating_sub(1);
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Bounds = Bounds { min_x: 0.0, min_y: 0.0, max_x: 800.0, max_y: 600.0 };

    fn cell(y: f32) -> Bounds {
        Bounds::new(0.0, y, 100.0, y + 100.0)
    }

    fn loader(len: usize, max_in_flight: usize) -> LazyLoader {
        let mut loader = LazyLoader::new(ObserverConfig {
            root_margin_bottom: 50.0,
            threshold: 0.01,
            max_in_flight,
        });
        loader.reset(1, len);
        loader
    }

    #[test]
    fn test_no_fetch_before_intersection() {
        let mut loader = loader(3, 8);
        assert!(loader.observe(0, &cell(1000.0), &VIEWPORT).is_none());
        assert_eq!(loader.state(0), Some(LoadState::Placeholder));
        assert_eq!(loader.in_flight(), 0);
    }

    #[test]
    fn test_one_fetch_per_entry() {
        let mut loader = loader(2, 8);
        let mut tickets = Vec::new();

        for _ in 0..5 {
            for index in 0..2 {
                if let Some(ticket) = loader.observe(index, &cell(10.0), &VIEWPORT) {
                    tickets.push(ticket);
                }
            }
        }
        assert_eq!(tickets.len(), 2);

        for ticket in &tickets {
            assert!(loader.complete(*ticket, true));
        }
        for index in 0..2 {
            assert!(loader.observe(index, &cell(10.0), &VIEWPORT).is_none());
            assert_eq!(loader.state(index), Some(LoadState::Loaded));
        }
    }

    #[test]
    fn test_root_margin() {
        let loader = loader(1, 8);
        // 30 points below the fold: inside the 50 point margin
        assert!(loader.is_intersecting(&cell(630.0), &VIEWPORT));
        assert!(!loader.is_intersecting(&cell(660.0), &VIEWPORT));
    }

    #[test]
    fn test_threshold() {
        let loader = loader(1, 8);
        // 0.5 of 100 rows visible: below 1%
        assert!(!loader.is_intersecting(&cell(649.5), &VIEWPORT));
        // 2 of 100 rows visible
        assert!(loader.is_intersecting(&cell(648.0), &VIEWPORT));
    }

    #[test]
    fn test_in_flight_cap() {
        let mut loader = loader(3, 2);
        assert!(loader.observe(0, &cell(0.0), &VIEWPORT).is_some());
        let second = loader.observe(1, &cell(0.0), &VIEWPORT).unwrap();
        assert!(loader.observe(2, &cell(0.0), &VIEWPORT).is_none());
        assert_eq!(loader.state(2), Some(LoadState::Placeholder));

        loader.complete(second, false);
        assert_eq!(loader.state(1), Some(LoadState::Failed));
        assert!(loader.observe(2, &cell(0.0), &VIEWPORT).is_some());
        assert!(loader.observe(1, &cell(0.0), &VIEWPORT).is_none());
    }

    #[test]
    fn test_stale_generation_ignored() {
        let mut loader = loader(1, 8);
        let ticket = loader.observe(0, &cell(0.0), &VIEWPORT).unwrap();

        loader.reset(2, 1);
        assert_eq!(loader.in_flight(), 1);
        assert!(!loader.complete(ticket, true));
        assert_eq!(loader.state(0), Some(LoadState::Placeholder));
        assert_eq!(loader.in_flight(), 0);
    }

    #[test]
    fn test_cap_spans_generations() {
        let mut loader = loader(3, 2);
        let first = loader.observe(0, &cell(0.0), &VIEWPORT).unwrap();
        let second = loader.observe(1, &cell(0.0), &VIEWPORT).unwrap();

        loader.reset(2, 3);
        assert!(loader.observe(0, &cell(0.0), &VIEWPORT).is_none());

        assert!(!loader.complete(first, true));
        let fresh = loader.observe(0, &cell(0.0), &VIEWPORT).unwrap();
        assert_eq!(fresh.generation, 2);
        assert!(loader.observe(1, &cell(0.0), &VIEWPORT).is_none());

        assert!(!loader.complete(second, false));
        assert!(loader.observe(1, &cell(0.0), &VIEWPORT).is_some());
        assert_eq!(loader.in_flight(), 2);
    }

    #[test]
    fn test_duplicate_completion_ignored() {
        let mut loader = loader(1, 8);
        let ticket = loader.observe(0, &cell(0.0), &VIEWPORT).unwrap();
        assert!(loader.complete(ticket, true));
        assert!(!loader.complete(ticket, false));
        assert_eq!(loader.state(0), Some(LoadState::Loaded));
    }
}
