use serde::{Deserialize, Serialize};

/// Sales pipeline stage
///
/// The pipeline is a fixed 5-step progression:
/// test drive -> COE bidding -> registration -> delivery -> NPS survey.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    TestDrive,
    CloseDeal,
    Registration,
    Delivery,
    Nps,
}

/// One verifiable sub-task within a stage. The id is stable across releases;
/// the label is what users see and what generated task text is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChecklistItem {
    pub id: &'static str,
    pub label: &'static str,
}

const TEST_DRIVE_ITEMS: &[ChecklistItem] = &[
    ChecklistItem { id: "schedule_appointment", label: "Schedule appointment" },
    ChecklistItem { id: "verify_licence", label: "Verify driving licence" },
    ChecklistItem { id: "prepare_vehicle", label: "Prepare demo vehicle" },
    ChecklistItem { id: "conduct_test_drive", label: "Conduct test drive" },
    ChecklistItem { id: "collect_feedback", label: "Collect feedback" },
];

const CLOSE_DEAL_ITEMS: &[ChecklistItem] = &[
    ChecklistItem { id: "agree_price", label: "Agree on price" },
    ChecklistItem { id: "collect_deposit", label: "Collect deposit" },
    ChecklistItem { id: "submit_coe_bid", label: "Submit COE bid" },
    ChecklistItem { id: "confirm_coe", label: "Confirm successful COE bid" },
    ChecklistItem { id: "sign_agreement", label: "Sign sales agreement" },
];

const REGISTRATION_ITEMS: &[ChecklistItem] = &[
    ChecklistItem { id: "arrange_insurance", label: "Arrange insurance" },
    ChecklistItem { id: "submit_papers", label: "Submit registration papers" },
    ChecklistItem { id: "pay_fees", label: "Pay registration fees" },
    ChecklistItem { id: "receive_plates", label: "Receive number plates" },
];

const DELIVERY_ITEMS: &[ChecklistItem] = &[
    ChecklistItem { id: "final_inspection", label: "Final inspection" },
    ChecklistItem { id: "prepare_handover", label: "Prepare handover documents" },
    ChecklistItem { id: "schedule_delivery", label: "Schedule delivery" },
    ChecklistItem { id: "hand_over_keys", label: "Hand over keys" },
    ChecklistItem { id: "explain_features", label: "Walk through vehicle features" },
];

const NPS_ITEMS: &[ChecklistItem] = &[
    ChecklistItem { id: "send_survey", label: "Send NPS survey" },
    ChecklistItem { id: "follow_up_call", label: "Follow-up call" },
    ChecklistItem { id: "record_score", label: "Record NPS score" },
    ChecklistItem { id: "request_referral", label: "Ask for referral" },
];

impl PipelineStage {
    /// All stages in pipeline order
    pub fn all() -> [PipelineStage; 5] {
        [
            PipelineStage::TestDrive,
            PipelineStage::CloseDeal,
            PipelineStage::Registration,
            PipelineStage::Delivery,
            PipelineStage::Nps,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStage::TestDrive => "test_drive",
            PipelineStage::CloseDeal => "close_deal",
            PipelineStage::Registration => "registration",
            PipelineStage::Delivery => "delivery",
            PipelineStage::Nps => "nps",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "test_drive" => Some(PipelineStage::TestDrive),
            "close_deal" => Some(PipelineStage::CloseDeal),
            "registration" => Some(PipelineStage::Registration),
            "delivery" => Some(PipelineStage::Delivery),
            "nps" => Some(PipelineStage::Nps),
            _ => None,
        }
    }

    /// User-facing stage name, also used in generated task text
    pub fn display_name(&self) -> &'static str {
        match self {
            PipelineStage::TestDrive => "Test Drive",
            PipelineStage::CloseDeal => "COE Bidding",
            PipelineStage::Registration => "Registration",
            PipelineStage::Delivery => "Delivery",
            PipelineStage::Nps => "NPS Survey",
        }
    }

    /// The next stage in the pipeline, None at the end
    pub fn next(&self) -> Option<PipelineStage> {
        match self {
            PipelineStage::TestDrive => Some(PipelineStage::CloseDeal),
            PipelineStage::CloseDeal => Some(PipelineStage::Registration),
            PipelineStage::Registration => Some(PipelineStage::Delivery),
            PipelineStage::Delivery => Some(PipelineStage::Nps),
            PipelineStage::Nps => None,
        }
    }

    /// Fixed checklist catalog for this stage
    pub fn items(&self) -> &'static [ChecklistItem] {
        match self {
            PipelineStage::TestDrive => TEST_DRIVE_ITEMS,
            PipelineStage::CloseDeal => CLOSE_DEAL_ITEMS,
            PipelineStage::Registration => REGISTRATION_ITEMS,
            PipelineStage::Delivery => DELIVERY_ITEMS,
            PipelineStage::Nps => NPS_ITEMS,
        }
    }

    /// Look up a catalog item by its stable id
    pub fn item(&self, item_id: &str) -> Option<&'static ChecklistItem> {
        self.items().iter().find(|item| item.id == item_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_conversion() {
        for stage in PipelineStage::all() {
            assert_eq!(PipelineStage::from_str(stage.as_str()), Some(stage));
        }
        assert_eq!(PipelineStage::from_str("invalid"), None);
    }

    #[test]
    fn test_stage_order() {
        assert_eq!(PipelineStage::TestDrive.next(), Some(PipelineStage::CloseDeal));
        assert_eq!(PipelineStage::Delivery.next(), Some(PipelineStage::Nps));
        assert_eq!(PipelineStage::Nps.next(), None);
    }

    #[test]
    fn test_catalog_sizes() {
        for stage in PipelineStage::all() {
            let n = stage.items().len();
            assert!((4..=6).contains(&n), "{} has {} items", stage.as_str(), n);
        }
    }

    #[test]
    fn test_catalog_ids_unique_per_stage() {
        for stage in PipelineStage::all() {
            let items = stage.items();
            for item in items {
                assert_eq!(items.iter().filter(|i| i.id == item.id).count(), 1);
            }
        }
    }

    #[test]
    fn test_item_lookup() {
        let item = PipelineStage::TestDrive.item("conduct_test_drive").unwrap();
        assert_eq!(item.label, "Conduct test drive");
        assert!(PipelineStage::TestDrive.item("pay_fees").is_none());
    }

    #[test]
    fn test_display_names() {
        assert_eq!(PipelineStage::CloseDeal.display_name(), "COE Bidding");
        assert_eq!(PipelineStage::Nps.display_name(), "NPS Survey");
    }

    #[test]
    fn test_serde_wire_names() {
        let json = serde_json::to_string(&PipelineStage::CloseDeal).unwrap();
        assert_eq!(json, "\"close_deal\"");
        let stage: PipelineStage = serde_json::from_str("\"nps\"").unwrap();
        assert_eq!(stage, PipelineStage::Nps);
    }
}
