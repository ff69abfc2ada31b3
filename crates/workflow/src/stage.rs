//! Wizard stages and the explicit transition table.

use serde::{Deserialize, Serialize};

use bloomframe_orders::{BouquetForm, CustomerSectionForm, PaperweightSectionForm};

/// The four wizard stages. Create mode walks them strictly in order; edit
/// mode opens one of the three data stages directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStage {
    CustomerData,
    BouquetData,
    PaperweightData,
    ReviewData,
}

impl WizardStage {
    pub const INITIAL: WizardStage = WizardStage::CustomerData;

    pub fn is_terminal(self) -> bool {
        self == WizardStage::ReviewData
    }

    /// The submission kind this stage accepts.
    pub fn expected_kind(self) -> StageKind {
        match self {
            WizardStage::CustomerData => StageKind::Customer,
            WizardStage::BouquetData => StageKind::Bouquets,
            WizardStage::PaperweightData => StageKind::Paperweight,
            WizardStage::ReviewData => StageKind::Review,
        }
    }
}

impl core::fmt::Display for WizardStage {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            WizardStage::CustomerData => "customer data",
            WizardStage::BouquetData => "bouquet data",
            WizardStage::PaperweightData => "paperweight data",
            WizardStage::ReviewData => "review",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardMode {
    Create,
    Edit,
}

/// One stage submission: a tagged payload carrying only its own section's
/// validated values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "stage", content = "values", rename_all = "snake_case")]
pub enum StageForm {
    Customer(CustomerSectionForm),
    Bouquets(Vec<BouquetForm>),
    Paperweight(PaperweightSectionForm),
    Review,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageKind {
    Customer,
    Bouquets,
    Paperweight,
    Review,
}

impl StageKind {
    pub fn name(self) -> &'static str {
        match self {
            StageKind::Customer => "customer",
            StageKind::Bouquets => "bouquet",
            StageKind::Paperweight => "paperweight",
            StageKind::Review => "review",
        }
    }
}

impl StageForm {
    pub fn kind(&self) -> StageKind {
        match self {
            StageForm::Customer(_) => StageKind::Customer,
            StageForm::Bouquets(_) => StageKind::Bouquets,
            StageForm::Paperweight(_) => StageKind::Paperweight,
            StageForm::Review => StageKind::Review,
        }
    }
}

/// The create-mode transition table: `{stage, submission kind} -> next`.
/// The review stage has no outgoing edge; its submission runs the pipeline.
const TRANSITIONS: &[(WizardStage, StageKind, WizardStage)] = &[
    (
        WizardStage::CustomerData,
        StageKind::Customer,
        WizardStage::BouquetData,
    ),
    (
        WizardStage::BouquetData,
        StageKind::Bouquets,
        WizardStage::PaperweightData,
    ),
    (
        WizardStage::PaperweightData,
        StageKind::Paperweight,
        WizardStage::ReviewData,
    ),
];

/// Look up the next stage for a submission, if the table defines one.
pub fn next_stage(stage: WizardStage, kind: StageKind) -> Option<WizardStage> {
    TRANSITIONS
        .iter()
        .find(|(from, on, _)| *from == stage && *on == kind)
        .map(|(_, _, to)| *to)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_mode_walks_the_stages_in_order() {
        let mut stage = WizardStage::INITIAL;
        let mut walked = vec![stage];
        while let Some(next) = next_stage(stage, stage.expected_kind()) {
            stage = next;
            walked.push(stage);
        }
        assert_eq!(
            walked,
            [
                WizardStage::CustomerData,
                WizardStage::BouquetData,
                WizardStage::PaperweightData,
                WizardStage::ReviewData,
            ]
        );
        assert!(stage.is_terminal());
    }

    #[test]
    fn no_transition_for_a_mismatched_submission() {
        assert_eq!(next_stage(WizardStage::CustomerData, StageKind::Paperweight), None);
        assert_eq!(next_stage(WizardStage::ReviewData, StageKind::Review), None);
    }
}
