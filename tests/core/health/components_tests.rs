use crate::common::statuspage_html;
use statusprobe::core::health::{
    extract_component_group, rollup, ComponentError, ComponentStatus, HealthStatus,
};

fn component(name: &str, status: HealthStatus) -> ComponentStatus {
    ComponentStatus {
        name: name.to_string(),
        status_text: status.to_string(),
        status,
    }
}

#[test]
fn test_extracts_only_the_named_group() {
    let html = statuspage_html(&[
        ("Atlanta, GA, United States - (ATL)", "Operational"),
        ("Chicago, IL, United States - (ORD)", "Under Maintenance"),
    ]);

    let components = extract_component_group(&html, "North America").unwrap();

    assert_eq!(
        components,
        vec![
            ComponentStatus {
                name: "Atlanta, GA, United States - (ATL)".to_string(),
                status_text: "Operational".to_string(),
                status: HealthStatus::Healthy,
            },
            ComponentStatus {
                name: "Chicago, IL, United States - (ORD)".to_string(),
                status_text: "Under Maintenance".to_string(),
                status: HealthStatus::Warning,
            },
        ]
    );
}

#[test]
fn test_group_name_match_ignores_case_and_padding() {
    let html = statuspage_html(&[("Toronto, ON, Canada - (YYZ)", "Operational")]);
    let components = extract_component_group(&html, "  north america ").unwrap();
    assert_eq!(components.len(), 1);
}

#[test]
fn test_other_group_is_independent() {
    let html = statuspage_html(&[("Denver, CO, United States - (DEN)", "Operational")]);
    let europe = extract_component_group(&html, "Europe").unwrap();
    assert_eq!(europe.len(), 1);
    assert_eq!(europe[0].status, HealthStatus::Critical);
}

#[test]
fn test_missing_group() {
    let html = statuspage_html(&[("Denver, CO, United States - (DEN)", "Operational")]);
    assert_eq!(
        extract_component_group(&html, "Asia"),
        Err(ComponentError::GroupNotFound("Asia".to_string()))
    );
    assert_eq!(
        extract_component_group("<html>Just a moment...</html>", "North America"),
        Err(ComponentError::GroupNotFound("North America".to_string()))
    );
}

#[test]
fn test_group_without_children() {
    let html = statuspage_html(&[]);
    assert_eq!(
        extract_component_group(&html, "North America"),
        Err(ComponentError::NoChildComponents("North America".to_string()))
    );
}

#[test]
fn test_rollup() {
    let healthy = component("a", HealthStatus::Healthy);
    let warning = component("b", HealthStatus::Warning);
    let critical = component("c", HealthStatus::Critical);
    let unknown = component("d", HealthStatus::Unknown);

    assert_eq!(rollup(&[healthy.clone(), healthy.clone()]), HealthStatus::Healthy);
    assert_eq!(rollup(&[healthy.clone(), warning.clone()]), HealthStatus::Warning);
    assert_eq!(
        rollup(&[warning.clone(), critical.clone(), healthy.clone()]),
        HealthStatus::Critical
    );
    assert_eq!(rollup(&[healthy.clone(), unknown.clone()]), HealthStatus::Unknown);
    assert_eq!(rollup(&[unknown, warning]), HealthStatus::Warning);
    assert_eq!(rollup(&[]), HealthStatus::Unknown);
}
