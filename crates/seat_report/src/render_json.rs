//! JSON renderer. Field order follows the model's struct layout.

use crate::structure::ReportModel;
use crate::ReportError;

/// Pretty-printed report JSON with a trailing newline.
pub fn render_json(model: &ReportModel) -> Result<String, ReportError> {
    let mut s = serde_json::to_string_pretty(model)
        .map_err(|e| ReportError::Serialize(e.to_string()))?;
    s.push('\n');
    Ok(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::{ChartSlice, ReportModel};

    #[test]
    fn keeps_section_order() {
        let m = ReportModel {
            title: "Seat allocation".into(),
            result_id: "RES:00".into(),
            tie_policy: "lexicographic".into(),
            total_seats: 0,
            votes: vec![],
            seats: vec![],
            constituencies: vec![],
            groups: vec![],
            chart: vec![ChartSlice {
                label: String::new(),
                seats: 0,
                color: "#FFFFFF".into(),
                filler: true,
            }],
            diagnostics: vec![],
        };
        let s = render_json(&m).unwrap();
        let title = s.find("\"title\"").unwrap();
        let chart = s.find("\"chart\"").unwrap();
        let diag = s.find("\"diagnostics\"").unwrap();
        assert!(title < chart && chart < diag);
        assert!(s.ends_with("}\n"));
    }
}
