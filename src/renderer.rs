use chrono::{DateTime, NaiveDateTime};

use crate::models::{
    appointment::AppointmentEvent,
    notification::NotificationContent,
    records::{Doctor, Patient, ResolvedContext},
};

pub const NOT_SPECIFIED: &str = "Not specified";
pub const NOT_PROVIDED: &str = "Not provided";
pub const NO_NOTES: &str = "No additional notes";

const SCHEDULE_DISPLAY: &str = "%-d %b, %Y at %-I:%M %p";
const NAIVE_SCHEDULE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Every displayed value after fallback, shared by all output variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationFields {
    pub schedule: String,
    pub reason: String,
    pub status: String,
    pub note: String,
    pub patient_name: String,
    pub patient_phone: String,
    pub patient_address: String,
    pub doctor_name: String,
    pub clinic_name: String,
    pub clinic_address: String,
    pub clinic_phone: String,
}

impl NotificationFields {
    /// Resolved record value, then the event's inline value, then a placeholder.
    pub fn resolve(
        event: &AppointmentEvent,
        patient: Option<&Patient>,
        doctor: Option<&Doctor>,
    ) -> Self {
        Self {
            schedule: event
                .schedule
                .as_deref()
                .and_then(format_schedule)
                .unwrap_or_else(|| NOT_SPECIFIED.to_string()),
            reason: pick(None, event.reason.as_ref(), NOT_SPECIFIED),
            status: pick(None, event.status.as_ref(), NOT_SPECIFIED),
            note: pick(None, event.note.as_ref(), NO_NOTES),
            patient_name: pick(
                patient.and_then(|p| p.name.as_ref()),
                event.name.as_ref(),
                NOT_PROVIDED,
            ),
            patient_phone: pick(
                patient.and_then(|p| p.phone.as_ref()),
                event.phone.as_ref(),
                NOT_PROVIDED,
            ),
            patient_address: pick(
                patient.and_then(|p| p.address.as_ref()),
                event.address.as_ref(),
                NOT_PROVIDED,
            ),
            doctor_name: pick(
                doctor.and_then(|d| d.name.as_ref()),
                event.primary_physician.as_ref(),
                NOT_PROVIDED,
            ),
            clinic_name: pick(doctor.and_then(|d| d.clinic_name.as_ref()), None, NOT_PROVIDED),
            clinic_address: pick(
                doctor.and_then(|d| d.clinic_address.as_ref()),
                None,
                NOT_PROVIDED,
            ),
            clinic_phone: pick(doctor.and_then(|d| d.clinic_phone.as_ref()), None, NOT_PROVIDED),
        }
    }

    pub fn subject(&self) -> String {
        format!(
            "New Appointment Created - {} with {}",
            self.patient_name, self.doctor_name
        )
    }

    pub fn text_body(&self) -> String {
        let mut lines = vec![
            format!(
                "New appointment created for {} with {} on {}.",
                self.patient_name, self.doctor_name, self.schedule
            ),
            String::new(),
        ];

        for (section, rows) in self.sections() {
            lines.push(section.to_string());
            for (label, value) in rows {
                lines.push(format!("{}: {}", label, value));
            }
            lines.push(String::new());
        }

        lines.join("\n").trim_end().to_string()
    }

    pub fn html_body(&self) -> String {
        let mut sections = String::new();

        for (section, rows) in self.sections() {
            sections.push_str("    <div class=\"section\">\n");
            sections.push_str(&format!("      <h3>{}</h3>\n", section));
            for (label, value) in rows {
                sections.push_str(&format!(
                    "      <p><span class=\"label\">{}:</span><span class=\"value\">{}</span></p>\n",
                    label,
                    escape_html(value)
                ));
            }
            sections.push_str("    </div>\n");
        }

        format!("{}{}{}", HTML_HEAD, sections, HTML_TAIL)
    }

    fn sections(&self) -> [(&'static str, Vec<(&'static str, &str)>); 3] {
        [
            (
                "Appointment Details",
                vec![
                    ("Schedule", self.schedule.as_str()),
                    ("Reason", self.reason.as_str()),
                    ("Status", self.status.as_str()),
                    ("Note", self.note.as_str()),
                ],
            ),
            (
                "Patient Information",
                vec![
                    ("Name", self.patient_name.as_str()),
                    ("Phone", self.patient_phone.as_str()),
                    ("Address", self.patient_address.as_str()),
                ],
            ),
            (
                "Doctor Information",
                vec![
                    ("Doctor Name", self.doctor_name.as_str()),
                    ("Clinic Name", self.clinic_name.as_str()),
                    ("Clinic Address", self.clinic_address.as_str()),
                    ("Clinic Phone", self.clinic_phone.as_str()),
                ],
            ),
        ]
    }
}

const HTML_HEAD: &str = r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>New Appointment Notification</title>
  <style>
    body { font-family: Arial, sans-serif; line-height: 1.6; color: #333; }
    .container { max-width: 600px; margin: 0 auto; padding: 20px; }
    .header { background-color: #f4f4f4; padding: 20px; border-radius: 5px; margin-bottom: 20px; }
    .section { margin-bottom: 20px; }
    .label { font-weight: bold; color: #555; }
    .value { margin-left: 10px; }
  </style>
</head>
<body>
  <div class="container">
    <div class="header">
      <h2>New Appointment Created</h2>
    </div>
"#;

const HTML_TAIL: &str = "  </div>\n</body>\n</html>\n";

/// Builds the notification for one event. Deterministic and infallible.
pub fn render(
    event: &AppointmentEvent,
    patient: Option<&Patient>,
    doctor: Option<&Doctor>,
) -> NotificationContent {
    let fields = NotificationFields::resolve(event, patient, doctor);

    NotificationContent {
        subject: fields.subject(),
        html_body: fields.html_body(),
        text_body: fields.text_body(),
    }
}

pub fn render_context(context: &ResolvedContext) -> NotificationContent {
    render(
        &context.event,
        context.patient.as_ref(),
        context.doctor.as_ref(),
    )
}

/// Formats a schedule timestamp as e.g. `14 Sep, 2025 at 9:00 AM`.
///
/// Offset-carrying timestamps are shown in their own offset; naive ones as
/// written. Returns `None` when nothing parses.
pub fn format_schedule(raw: &str) -> Option<String> {
    let raw = raw.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.format(SCHEDULE_DISPLAY).to_string());
    }

    NAIVE_SCHEDULE_FORMATS
        .iter()
        .find_map(|pattern| NaiveDateTime::parse_from_str(raw, pattern).ok())
        .map(|parsed| parsed.format(SCHEDULE_DISPLAY).to_string())
}

fn pick(record: Option<&String>, inline: Option<&String>, placeholder: &str) -> String {
    record
        .or(inline)
        .cloned()
        .unwrap_or_else(|| placeholder.to_string())
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
