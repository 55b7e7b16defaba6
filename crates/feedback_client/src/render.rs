//! HTML fragments for the form, entry list, pagination and detail card.
//!
//! Every value coming from the endpoint is escaped here, including stored
//! message markup and validation messages.

use crate::form::FormNotice;
use crate::pagination::PageControl;
use chrono::{DateTime, Utc};
use feedback_core::{EntrySummary, FeedbackEntry, FormField, SubmissionForm, UiStrings};

/// Escapes text for use in element content and quoted attributes.
pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Formats epoch milliseconds as a UTC date-time.
///
/// Out-of-range values fall back to the raw number.
pub fn format_timestamp(epoch_ms: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(epoch_ms)
        .map(|time| time.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| epoch_ms.to_string())
}

/// Renders the feedback form with the current values.
pub fn render_form(values: &SubmissionForm, submit_enabled: bool) -> String {
    let fields: String = FormField::ALL
        .into_iter()
        .map(|field| render_form_row(field, values.value(field)))
        .collect();
    let button = if submit_enabled {
        r#"<button type="submit" class="wpf-btn">Send</button>"#
    } else {
        r#"<button type="submit" class="wpf-btn" disabled>Send</button>"#
    };
    format!(
        r#"<form id="wpf-form" class="wpf-form" autocomplete="on" novalidate>{fields}{button}</form>"#
    )
}

fn render_form_row(field: FormField, value: &str) -> String {
    let name = field.name();
    let label = escape_html(field.label());
    let value = escape_html(value);
    let control = match field {
        FormField::Message => format!(
            r#"<textarea id="wpf_{name}" name="{name}" rows="6" required>{value}</textarea>"#
        ),
        FormField::Email => format!(
            r#"<input type="email" id="wpf_{name}" name="{name}" value="{value}" required>"#
        ),
        _ => format!(
            r#"<input type="text" id="wpf_{name}" name="{name}" value="{value}" required>"#
        ),
    };
    format!(r#"<div class="wpf-row"><label for="wpf_{name}">{label}</label>{control}</div>"#)
}

/// Renders one form notice.
pub fn render_notice(notice: &FormNotice) -> String {
    match notice {
        FormNotice::Thanks(message) => {
            format!(r#"<p class="wpf-thanks">{}</p>"#, escape_html(message))
        }
        FormNotice::Errors(errors) => {
            let items: String = errors
                .iter()
                .map(|error| format!("<li>{}</li>", escape_html(error)))
                .collect();
            format!(r#"<ul class="wpf-errors">{items}</ul>"#)
        }
        FormNotice::Error(message) => escape_html(message),
    }
}

/// Renders the list rows; `active` marks the row whose detail is open.
pub fn render_rows(rows: &[EntrySummary], active: Option<i64>, strings: &UiStrings) -> String {
    if rows.is_empty() {
        return format!("<p>{}</p>", escape_html(&strings.no_entries));
    }

    let items: String = rows
        .iter()
        .map(|row| render_row(row, active == Some(row.id)))
        .collect();
    format!(
        concat!(
            r#"<div class="wpf-head">"#,
            r#"<span class="wpf-col wpf-name"><strong>Name</strong></span>"#,
            r#"<span class="wpf-col wpf-email"><strong>Email</strong></span>"#,
            r#"<span class="wpf-col wpf-subject"><strong>Subject</strong></span>"#,
            r#"<span class="wpf-col wpf-date"><strong>Date</strong></span>"#,
            "</div>{items}"
        ),
        items = items,
    )
}

fn render_row(row: &EntrySummary, active: bool) -> String {
    format!(
        concat!(
            r#"<button class="{class}" data-id="{id}" type="button">"#,
            r#"<span class="wpf-col wpf-name">{name}</span>"#,
            r#"<span class="wpf-col wpf-email">{email}</span>"#,
            r#"<span class="wpf-col wpf-subject">{subject}</span>"#,
            r#"<span class="wpf-col wpf-date">{date}</span>"#,
            "</button>"
        ),
        class = if active { "wpf-item is-active" } else { "wpf-item" },
        id = row.id,
        name = escape_html(&format!("{} {}", row.first_name, row.last_name)),
        email = escape_html(&row.email),
        subject = escape_html(&row.subject),
        date = escape_html(&format_timestamp(row.created_at)),
    )
}

/// Renders pagination buttons.
pub fn render_pagination(controls: &[PageControl]) -> String {
    controls
        .iter()
        .map(|control| match *control {
            PageControl::Prev(page) => {
                format!(r#"<button class="wpf-page" data-p="{page}">&laquo; Prev</button>"#)
            }
            PageControl::Number { page, active: true } => {
                format!(r#"<button class="wpf-page is-active" data-p="{page}">{page}</button>"#)
            }
            PageControl::Number { page, active: false } => {
                format!(r#"<button class="wpf-page" data-p="{page}">{page}</button>"#)
            }
            PageControl::Next(page) => {
                format!(r#"<button class="wpf-page" data-p="{page}">Next &raquo;</button>"#)
            }
        })
        .collect()
}

/// Renders the detail card for one entry.
///
/// The message is shown as preformatted escaped text, markup included.
pub fn render_detail(entry: &FeedbackEntry) -> String {
    format!(
        concat!(
            r#"<div class="wpf-card">"#,
            r#"<button type="button" class="wpf-close">Close &times;</button>"#,
            "<div><strong>First name:</strong> {first}</div>",
            "<div><strong>Last name:</strong> {last}</div>",
            "<div><strong>Email:</strong> {email}</div>",
            "<div><strong>Subject:</strong> {subject}</div>",
            r#"<div><strong>Message:</strong><br><pre class="wpf-msg">{message}</pre></div>"#,
            "<div><strong>Date:</strong> {date}</div>",
            "</div>"
        ),
        first = escape_html(&entry.first_name),
        last = escape_html(&entry.last_name),
        email = escape_html(&entry.email),
        subject = escape_html(&entry.subject),
        message = escape_html(&entry.message),
        date = escape_html(&format_timestamp(entry.created_at)),
    )
}

/// Notice shown instead of the list shell to callers who may not browse.
pub fn render_unauthorized(strings: &UiStrings) -> String {
    format!(
        r#"<div class="wpf-wrap"><p class="wpf-unauth">{}</p></div>"#,
        escape_html(&strings.unauthorized)
    )
}

/// Single-message paragraph used for list and detail failures.
pub fn render_error(strings: &UiStrings) -> String {
    format!("<p>{}</p>", escape_html(&strings.error))
}

#[cfg(test)]
mod tests {
    use super::{
        escape_html, format_timestamp, render_detail, render_form, render_notice,
        render_pagination, render_rows,
    };
    use crate::form::FormNotice;
    use crate::pagination::page_controls;
    use feedback_core::{EntrySummary, FeedbackEntry, SubmissionForm, UiStrings};

    fn summary(id: i64, subject: &str) -> EntrySummary {
        EntrySummary {
            id,
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            subject: subject.to_string(),
            created_at: 0,
        }
    }

    #[test]
    fn escapes_markup_and_quotes() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn formats_epoch_millis_in_utc() {
        assert_eq!(format_timestamp(0), "1970-01-01 00:00:00");
        assert_eq!(format_timestamp(1_700_000_000_000), "2023-11-14 22:13:20");
        assert_eq!(format_timestamp(i64::MAX), i64::MAX.to_string());
    }

    #[test]
    fn validation_messages_are_escaped_list_items() {
        let html = render_notice(&FormNotice::Errors(vec![
            "The Subject field is required.".to_string(),
            "<script>".to_string(),
        ]));
        assert_eq!(
            html,
            r#"<ul class="wpf-errors"><li>The Subject field is required.</li><li>&lt;script&gt;</li></ul>"#
        );
    }

    #[test]
    fn form_escapes_values_and_disables_button_while_submitting() {
        let values = SubmissionForm {
            first_name: r#"Ada "The Countess""#.to_string(),
            message: "</textarea><script>".to_string(),
            ..SubmissionForm::default()
        };

        let idle = render_form(&values, true);
        assert!(idle.contains(
            r#"<input type="text" id="wpf_first_name" name="first_name" value="Ada &quot;The Countess&quot;" required>"#
        ));
        assert!(idle.contains(r#"required>&lt;/textarea&gt;&lt;script&gt;</textarea>"#));
        assert!(idle.contains(r#"<button type="submit" class="wpf-btn">Send</button>"#));
        assert_eq!(idle.matches(r#"<div class="wpf-row">"#).count(), 5);

        let busy = render_form(&values, false);
        assert!(
            busy.contains(r#"<button type="submit" class="wpf-btn" disabled>Send</button>"#)
        );
    }

    #[test]
    fn empty_rows_render_no_entries_notice() {
        assert_eq!(
            render_rows(&[], None, &UiStrings::default()),
            "<p>No entries found.</p>"
        );
    }

    #[test]
    fn rows_escape_values_and_mark_active() {
        let rows = vec![summary(2, "<b>bold</b>"), summary(1, "plain")];
        let html = render_rows(&rows, Some(1), &UiStrings::default());
        assert!(html.contains("&lt;b&gt;bold&lt;/b&gt;"));
        assert!(!html.contains("<b>bold"));
        assert!(html.contains(r#"<button class="wpf-item" data-id="2" type="button">"#));
        assert!(html.contains(r#"<button class="wpf-item is-active" data-id="1" type="button">"#));
    }

    #[test]
    fn pagination_marks_current_page() {
        let html = render_pagination(&page_controls(25, 1, 10));
        assert_eq!(
            html,
            concat!(
                r#"<button class="wpf-page is-active" data-p="1">1</button>"#,
                r#"<button class="wpf-page" data-p="2">2</button>"#,
                r#"<button class="wpf-page" data-p="3">3</button>"#,
                r#"<button class="wpf-page" data-p="2">Next &raquo;</button>"#
            )
        );
    }

    #[test]
    fn detail_shows_message_markup_as_text() {
        let entry = FeedbackEntry {
            id: 7,
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            subject: "Hi".to_string(),
            message: "Hello <strong>team</strong>".to_string(),
            created_at: 0,
        };
        let html = render_detail(&entry);
        assert!(html.contains(
            r#"<pre class="wpf-msg">Hello &lt;strong&gt;team&lt;/strong&gt;</pre>"#
        ));
        assert!(html.contains("<div><strong>Date:</strong> 1970-01-01 00:00:00</div>"));
    }
}
