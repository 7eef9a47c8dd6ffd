use tracing::debug;

use crate::transits::classifier::VerdictMap;
use crate::transits::types::BackgroundDaySet;

impl BackgroundDaySet {
    /// Selects the days whose verdict is OMNI, DOUBLE_GO or GOOD.
    pub fn from_verdicts(verdicts: &VerdictMap) -> Self {
        let days = verdicts
            .values()
            .filter(|verdict| verdict.is_background())
            .map(|verdict| verdict.day)
            .collect();

        let set = Self { days };
        debug!(background_days = set.len(), total_days = verdicts.len(), "Background days selected");
        set
    }
}
