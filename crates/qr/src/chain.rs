use {crate::*, image::Image};

/// Strategies tried in priority order.
///
/// The first strategy that yields at least one usable occurrence wins; later
/// ones are not consulted. A failing strategy counts as having found nothing,
/// and so does one that only found empty payloads.
pub struct DecoderChain {
    strategies: Vec<Box<dyn Detect>>,
}

impl DecoderChain {
    pub fn new(strategies: Vec<Box<dyn Detect>>) -> Self {
        Self { strategies }
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Decoded text of the selected symbol, or `None` if no strategy found one.
    pub fn decode(&self, image: &Image) -> Option<SymbolOccurrence> {
        for strategy in &self.strategies {
            let occurrences = match strategy.detect(image) {
                Ok(mut occurrences) => {
                    occurrences.retain(SymbolOccurrence::is_usable);
                    occurrences
                }
                Err(error) => {
                    log::warn!("qr: {} strategy failed: {}", strategy.name(), error);
                    continue;
                }
            };
            if occurrences.is_empty() {
                log::debug!("qr: {} strategy found nothing usable", strategy.name());
                continue;
            }
            log::debug!(
                "qr: {} strategy found {} symbol(s)",
                strategy.name(),
                occurrences.len()
            );
            return select_rightmost(occurrences);
        }
        None
    }
}
