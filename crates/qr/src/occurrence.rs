use base::Vec2;

/// One decoded QR symbol and where it sits in the frame.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolOccurrence {
    pub text: String,
    /// Centre of the symbol, in frame pixel coordinates.
    pub position: Vec2<f32>,
}

impl SymbolOccurrence {
    pub fn new(text: impl Into<String>, position: Vec2<f32>) -> Self {
        Self {
            text: text.into(),
            position,
        }
    }

    /// An empty payload identifies no parcel.
    pub fn is_usable(&self) -> bool {
        !self.text.is_empty()
    }
}

/// Occurrences that can be selected: regions that decoded to a non-empty text.
pub fn usable_occurrences(
    found: impl IntoIterator<Item = Option<SymbolOccurrence>>,
) -> Vec<SymbolOccurrence> {
    found
        .into_iter()
        .flatten()
        .filter(SymbolOccurrence::is_usable)
        .collect()
}

/// Pick the occurrence furthest to the right.
///
/// The scanning jig places the parcel label on the right-hand side of the
/// camera's view, so stray codes on the left are ignored. Equal horizontal
/// positions keep the occurrence that came first.
pub fn select_rightmost(occurrences: Vec<SymbolOccurrence>) -> Option<SymbolOccurrence> {
    let mut best: Option<SymbolOccurrence> = None;
    for occurrence in occurrences {
        match &best {
            Some(current) if occurrence.position.x <= current.position.x => {}
            _ => best = Some(occurrence),
        }
    }
    best
}
