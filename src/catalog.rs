//! Static catalog of supported intent-signal labels.
//!
//! Consumed two ways: to constrain AI-path prompts to known labels, and to
//! validate keyword-rule outputs. Never mutated at runtime.

/// Ordered vocabulary of intent signals the engine can report.
pub const INTENT_SIGNALS: &[&str] = &[
    "Series A Follow-On Needed",
    "Series B Preparation",
    "Seed to Series A Transition",
    "Post-Funding Sales Scaling",
    "CRO Hiring Urgency",
    "VP Sales Hiring",
    "Pipeline Anxiety",
    "Revenue Plateau",
    "Customer Acquisition Cost Issues",
    "GTM Strategy Overhaul",
    "Sales Process Optimization",
    "Revenue Operations Setup",
    "Product-Market Fit to Scale",
    "Sales Team Scaling",
    "International Expansion",
    "Enterprise Sales Transition",
    "Revenue Growth Acceleration",
    "Sales Consultant Search",
    "CRM Implementation",
    "Sales Efficiency Issues",
    "Growth Consultant Needed",
    "Funding Preparation Sales Readiness",
    "ARR Growth Stagnation",
    "Pipeline Generation Issues",
    "Sales Cycle Too Long",
    "Lead Conversion Problems",
    "Territory Expansion Planning",
    "Sales Enablement Gaps",
    "Quota Attainment Issues",
    "Channel Partner Strategy",
    "Inside Sales Scaling",
    "Outbound Strategy Development",
    "Inbound Lead Qualification",
];

/// True if `label` is a catalog entry (exact match).
pub fn is_known_signal(label: &str) -> bool {
    INTENT_SIGNALS.contains(&label)
}

/// Comma-separated label list for embedding into AI prompts.
pub fn prompt_label_list() -> String {
    INTENT_SIGNALS.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_has_the_expected_entries() {
        assert_eq!(INTENT_SIGNALS.len(), 33);
        assert!(is_known_signal("CRO Hiring Urgency"));
        assert!(is_known_signal("Series A Follow-On Needed"));
        assert!(!is_known_signal("cro hiring urgency"));
    }

    #[test]
    fn prompt_list_is_ordered_like_the_catalog() {
        let list = prompt_label_list();
        assert!(list.starts_with("Series A Follow-On Needed, Series B Preparation"));
        assert!(list.ends_with("Inbound Lead Qualification"));
    }
}
