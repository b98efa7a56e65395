//! Emergency response recommendations per severity tier

use crate::fusion::Severity;

const SEVERE_ACTIONS: &[&str] = &[
    "Immediately contact emergency services (911/108)",
    "Dispatch ambulance and fire rescue",
    "Alert nearby hospitals",
    "Notify traffic control for road clearance",
    "Send high-priority alerts to emergency contacts",
];

const MODERATE_ACTIONS: &[&str] = &[
    "Contact emergency services",
    "Dispatch ambulance",
    "Alert nearby medical facilities",
    "Notify emergency contacts",
    "Monitor situation closely",
];

const MINOR_ACTIONS: &[&str] = &[
    "Check for injuries",
    "Contact emergency services if needed",
    "Notify emergency contacts",
    "Document incident details",
    "Seek medical attention if required",
];

/// Ordered actions for a severity tier; empty for [`Severity::None`]
pub fn recommendations(severity: Severity) -> &'static [&'static str] {
    match severity {
        Severity::Severe => SEVERE_ACTIONS,
        Severity::Moderate => MODERATE_ACTIONS,
        Severity::Minor => MINOR_ACTIONS,
        Severity::None => &[],
    }
}

/// Owned copy of [`recommendations`] for result payloads
pub fn recommendation_list(severity: Severity) -> Vec<String> {
    recommendations(severity)
        .iter()
        .map(|action| action.to_string())
        .collect()
}
