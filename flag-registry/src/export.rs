//! CSV report of a flag listing, in the column layout reviewers already use
//! for offline follow-up.

use crate::Flag;

pub const REPORT_FILE_NAME: &str = "flagged_accounts_report.csv";

const HEADER: [&str; 9] = [
    "ID",
    "Platform",
    "Handle",
    "Display Name",
    "Description",
    "Risk Score",
    "Reasons",
    "First Seen",
    "Last Seen",
];

pub fn to_csv(flags: &[Flag]) -> String {
    let mut out = String::new();
    push_row(&mut out, HEADER.iter().map(|h| h.to_string()));
    for flag in flags {
        push_row(
            &mut out,
            [
                flag.id.map(|id| id.to_string()).unwrap_or_default(),
                flag.platform.clone(),
                flag.handle.clone(),
                flag.display_name.clone().unwrap_or_default(),
                flag.description_text().to_string(),
                flag.risk_score_text(),
                flag.reasons
                    .as_ref()
                    .map(|r| r.joined("; "))
                    .unwrap_or_default(),
                flag.created_at.clone().unwrap_or_default(),
                flag.last_seen.clone().unwrap_or_default(),
            ],
        );
    }
    out
}

fn push_row(out: &mut String, fields: impl IntoIterator<Item = String>) {
    for (i, field) in fields.into_iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        push_field(out, &field);
    }
    out.push_str("\r\n");
}

fn push_field(out: &mut String, field: &str) {
    if !field.contains([',', '"', '\r', '\n']) {
        out.push_str(field);
        return;
    }
    out.push('"');
    out.push_str(&field.replace('"', "\"\""));
    out.push('"');
}
