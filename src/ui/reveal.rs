//! Staggered reveal of the hero sections
//!
//! Once a page is displayed, the heading appears first, then the genre tags,
//! the overview and the cast, one step apart. Driven by the event loop tick.

/// Ticks before the first section shows
const DELAY_TICKS: u32 = 4;
/// Ticks between consecutive sections
const STAGGER_TICKS: u32 = 2;

/// Hero sections in reveal order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealSection {
    Heading,
    Genres,
    Overview,
    Cast,
}

impl RevealSection {
    pub const ALL: [RevealSection; 4] = [
        RevealSection::Heading,
        RevealSection::Genres,
        RevealSection::Overview,
        RevealSection::Cast,
    ];

    fn order(self) -> u32 {
        match self {
            RevealSection::Heading => 0,
            RevealSection::Genres => 1,
            RevealSection::Overview => 2,
            RevealSection::Cast => 3,
        }
    }

    fn due_at(self) -> u32 {
        DELAY_TICKS + self.order() * STAGGER_TICKS
    }
}

#[derive(Debug, Clone, Default)]
pub struct Reveal {
    ticks: u32,
}

impl Reveal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hide everything and start over
    pub fn restart(&mut self) {
        self.ticks = 0;
    }

    pub fn tick(&mut self) {
        self.ticks = self.ticks.saturating_add(1);
    }

    /// Skip straight to the fully revealed state
    pub fn finish(&mut self) {
        self.ticks = RevealSection::Cast.due_at();
    }

    pub fn is_visible(&self, section: RevealSection) -> bool {
        self.ticks >= section.due_at()
    }

    pub fn is_complete(&self) -> bool {
        self.is_visible(RevealSection::Cast)
    }
}
