//! Plain-text briefing renderer.
//!
//! Produces the document the consolidator pastes into the message sent
//! to the regional director. The salutation and preamble carry blanks
//! (`___`) that the operator fills in by hand before sending.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};
use sitrep_report_models::AlertKind;

use crate::{NO_DATA, ProvinceSummary};

/// Separator placed after every province block.
pub const PROVINCE_DELIMITER: &str = "- - - - - - - - - -";

/// Opening lines of the briefing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BriefingTemplate {
    /// First line, e.g. `Good day, Sec. Rex.`
    pub salutation: String,
    /// Paragraph introducing the per-province updates.
    pub preamble: String,
}

impl Default for BriefingTemplate {
    fn default() -> Self {
        Self {
            salutation: "Good day, Sec. Rex.".to_string(),
            preamble: "Following the magnitude ___ earthquake that was recorded in \
                       __________ , here are the latest situation updates per province:"
                .to_string(),
        }
    }
}

/// Renders the briefing text for the given summaries.
///
/// Every province gets the same fixed-order block; missing narrative
/// fields are replaced with bracketed placeholders and counts are always
/// shown. Returns [`NO_DATA`] for an empty input.
#[must_use]
pub fn render_briefing(summaries: &[ProvinceSummary], template: &BriefingTemplate) -> String {
    if summaries.is_empty() {
        return NO_DATA.to_string();
    }

    let mut text = String::new();
    writeln!(text, "{}\n", template.salutation).unwrap();
    writeln!(text, "{}\n", template.preamble).unwrap();

    for summary in summaries {
        write_province(&mut text, summary);
    }

    text.trim().to_string()
}

fn write_province(text: &mut String, summary: &ProvinceSummary) {
    let fields = &summary.fields;

    writeln!(text, "{}\n", summary.province.name).unwrap();

    writeln!(
        text,
        "{}\n",
        fields
            .situation_overview
            .as_deref()
            .unwrap_or("[Province situation overview needed]")
    )
    .unwrap();

    match fields.intensity {
        Some(intensity) => writeln!(text, "{intensity}\n").unwrap(),
        None => writeln!(text, "[Intensity level needed]\n").unwrap(),
    }

    writeln!(
        text,
        "{}",
        fields
            .coordination_notes
            .as_deref()
            .unwrap_or("[Coordination notes needed]")
    )
    .unwrap();

    writeln!(text, "\nAffected Population: {}", summary.affected_population()).unwrap();
    writeln!(text, "Damaged Houses: {}", summary.damaged_houses()).unwrap();

    let casualties = &fields.casualties;
    if casualties.is_none() {
        writeln!(text, "Casualties: None").unwrap();
    } else {
        writeln!(
            text,
            "Casualties: {} injured / {} wounded / {} dead",
            casualties.injured, casualties.wounded, casualties.dead
        )
        .unwrap();
    }

    writeln!(text).unwrap();
    for kind in AlertKind::all() {
        let remark = fields
            .alerts
            .remarks(*kind)
            .map_or_else(|| kind.none_phrase(), str::to_string);
        writeln!(text, "{}: {remark}", kind.label()).unwrap();
    }

    writeln!(text, "\n{PROVINCE_DELIMITER}\n").unwrap();
}
