//! HTML dashboard renderer for the consolidator view.
//!
//! Emits one `<section>` per province. Narrative fields and alerts only
//! appear when present; damaged houses and casualties are always shown.

use std::fmt::Write as _;

use sitrep_report_models::AlertKind;

use crate::{NO_DATA, ProvinceSummary};

/// Renders the dashboard fragment for the given summaries.
#[must_use]
pub fn render_dashboard(summaries: &[ProvinceSummary]) -> String {
    if summaries.is_empty() {
        return format!("<p class=\"no-data\">{NO_DATA}</p>\n");
    }

    let mut html = String::new();
    for summary in summaries {
        write_province(&mut html, summary);
    }
    html
}

fn write_province(html: &mut String, summary: &ProvinceSummary) {
    let fields = &summary.fields;

    writeln!(
        html,
        "<section class=\"province-report\" data-province=\"{}\">",
        escape(&summary.province.code)
    )
    .unwrap();
    writeln!(html, "<h3>{}</h3>", escape(&summary.province.name)).unwrap();

    if let Some(overview) = &fields.situation_overview {
        field(html, "Situation Overview", &escape(overview));
    }

    if let Some(intensity) = fields.intensity {
        field(html, "Intensity", &escape(&intensity.to_string()));
    }

    if fields.affected_families > 0 || fields.affected_persons > 0 {
        field(html, "Affected Population", &summary.affected_population());
    }

    field(html, "Damaged Houses", &summary.damaged_houses());

    let casualties = &fields.casualties;
    let counts: Vec<String> = [
        (casualties.injured, "injured"),
        (casualties.wounded, "wounded"),
        (casualties.dead, "dead"),
    ]
    .into_iter()
    .filter(|(n, _)| !casualties.no_casualties && *n > 0)
    .map(|(n, label)| format!("{n} {label}"))
    .collect();
    if counts.is_empty() {
        field(html, "Casualties", "None");
    } else {
        field(html, "Casualties", &counts.join(", "));
    }

    if let Some(notes) = &fields.coordination_notes {
        field(html, "Coordination Notes", &escape(notes));
    }

    if fields.alerts.any_active() {
        writeln!(html, "<div class=\"alerts\">").unwrap();
        for kind in AlertKind::all() {
            if !fields.alerts.is_active(*kind) {
                continue;
            }
            match fields.alerts.remarks(*kind) {
                Some(remark) => {
                    writeln!(html, "<p>{}: {}</p>", kind.label(), escape(remark)).unwrap();
                }
                None => writeln!(html, "<p>{}</p>", kind.label()).unwrap(),
            }
        }
        writeln!(html, "</div>").unwrap();
    }

    writeln!(html, "</section>").unwrap();
}

fn field(html: &mut String, label: &str, value: &str) {
    writeln!(html, "<p><strong>{label}:</strong> {value}</p>").unwrap();
}

/// Escapes text for inclusion in HTML content or attribute values.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use sitrep_report_models::{Casualties, Intensity, ReportFields};

    use super::*;
    use crate::consolidate;
    use crate::test_support::record;

    #[test]
    fn empty_input() {
        assert_eq!(
            render_dashboard(&[]),
            "<p class=\"no-data\">No data available</p>\n"
        );
    }

    #[test]
    fn optional_blocks_hidden_when_default() {
        let html = render_dashboard(&consolidate(&[record(
            1,
            "1685",
            "Dinagat Islands",
            ReportFields::default(),
        )]));

        assert!(html.contains("<h3>Dinagat Islands</h3>"));
        assert!(!html.contains("Intensity"));
        assert!(!html.contains("Affected Population"));
        assert!(!html.contains("class=\"alerts\""));
        assert!(html.contains(
            "<p><strong>Damaged Houses:</strong> 0 totally damaged, 0 partially damaged</p>"
        ));
        assert!(html.contains("<p><strong>Casualties:</strong> None</p>"));
    }

    #[test]
    fn populated_province() {
        let mut fields = ReportFields {
            intensity: Some(Intensity::V),
            affected_families: 1,
            affected_persons: 0,
            casualties: Casualties {
                no_casualties: false,
                injured: 2,
                wounded: 0,
                dead: 1,
            },
            ..ReportFields::default()
        };
        fields
            .alerts
            .set(AlertKind::Tsunami, true, Some("Advisory <level 1>".to_string()));
        fields.alerts.set(AlertKind::Gale, true, None);

        let html = render_dashboard(&consolidate(&[record(1, "1603", "Surigao del Sur", fields)]));

        assert!(html.contains("<p><strong>Intensity:</strong> Intensity V - Strong</p>"));
        assert!(html.contains("<p><strong>Affected Population:</strong> 1 family or 0 persons</p>"));
        assert!(html.contains("<p><strong>Casualties:</strong> 2 injured, 1 dead</p>"));
        assert!(html.contains("<p>Tsunami Alert: Advisory &lt;level 1&gt;</p>"));
        assert!(html.contains("<p>Gale Warning</p>"));
        assert!(!html.contains("Power Interruption"));
    }

    #[test]
    fn rendering_is_deterministic() {
        let mut fields = ReportFields {
            situation_overview: Some("Landslide along the national road.".to_string()),
            affected_families: 2,
            ..ReportFields::default()
        };
        fields
            .alerts
            .set(AlertKind::Power, true, Some("Grid-wide outage".to_string()));
        let records = vec![
            record(2, "1602", "Surigao del Norte", fields),
            record(1, "1600", "Agusan del Norte", ReportFields::default()),
        ];

        let first = render_dashboard(&consolidate(&records));
        let second = render_dashboard(&consolidate(&records));
        assert_eq!(first, second);
        assert!(first.find("Agusan del Norte").unwrap() < first.find("Surigao del Norte").unwrap());
    }

    #[test]
    fn escapes_province_text() {
        assert_eq!(escape("A & B \"C\""), "A &amp; B &quot;C&quot;");
    }
}
