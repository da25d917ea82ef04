//! HTML projections: creation form, edit form and list view.
//!
//! Everything here is a pure function of its inputs. Values coming from
//! users or the backend go through [`escape`] before reaching markup.

use std::fmt::Write as _;

use crate::session::Session;

pub(crate) fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

pub(crate) fn money(amount: f64) -> String {
    format!("${amount:.2}")
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum FieldKind {
    Text,
    Email,
    Password,
    Number { step: &'static str },
    Date,
    DateTime,
    TextArea,
    /// `(value, label)` pairs.
    Select(Vec<(String, String)>),
    Hidden,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Field {
    pub(crate) name: &'static str,
    pub(crate) label: &'static str,
    pub(crate) kind: FieldKind,
    pub(crate) value: String,
    pub(crate) required: bool,
}

impl Field {
    pub(crate) fn new(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            value: String::new(),
            required: true,
        }
    }

    pub(crate) fn value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    /// Sets the value only when one is available.
    pub(crate) fn value_from<T>(self, source: Option<&T>, get: impl FnOnce(&T) -> String) -> Self {
        match source {
            Some(source) => self.value(get(source)),
            None => self,
        }
    }

    pub(crate) fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    fn render(&self, out: &mut String) {
        let name = self.name;
        let value = escape(&self.value);
        let required = if self.required { " required" } else { "" };

        if self.kind == FieldKind::Hidden {
            let _ = writeln!(out, "<input type=\"hidden\" name=\"{name}\" value=\"{value}\">");
            return;
        }

        let _ = writeln!(out, "<label for=\"{name}\">{}</label>", escape(self.label));
        let input_type = match &self.kind {
            FieldKind::TextArea => {
                let _ = writeln!(
                    out,
                    "<textarea id=\"{name}\" name=\"{name}\"{required}>{value}</textarea>"
                );
                return;
            }
            FieldKind::Select(options) => {
                let _ = writeln!(out, "<select id=\"{name}\" name=\"{name}\"{required}>");
                for (option, label) in options {
                    let selected = if *option == self.value { " selected" } else { "" };
                    let _ = writeln!(
                        out,
                        "<option value=\"{}\"{selected}>{}</option>",
                        escape(option),
                        escape(label)
                    );
                }
                out.push_str("</select>\n");
                return;
            }
            FieldKind::Text => "text".to_string(),
            FieldKind::Email => "email".to_string(),
            FieldKind::Password => "password".to_string(),
            FieldKind::Number { step } => format!("number\" step=\"{step}"),
            FieldKind::Date => "date".to_string(),
            FieldKind::DateTime => "datetime-local".to_string(),
            FieldKind::Hidden => "hidden".to_string(),
        };
        let _ = writeln!(
            out,
            "<input id=\"{name}\" type=\"{input_type}\" name=\"{name}\" value=\"{value}\"{required}>"
        );
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FormMode {
    Create,
    Edit,
    /// Forms that do not manage a record, such as sign-in.
    Action {
        heading: &'static str,
        submit: &'static str,
    },
}

/// A creation or edit form; `mode` decides the heading and submit label.
#[derive(Debug, Clone)]
pub(crate) struct FormView {
    pub(crate) entity: &'static str,
    pub(crate) mode: FormMode,
    pub(crate) description: String,
    pub(crate) action: String,
    pub(crate) cancel_href: String,
    pub(crate) fields: Vec<Field>,
    pub(crate) error: Option<String>,
}

impl FormView {
    pub(crate) fn heading(&self) -> String {
        match self.mode {
            FormMode::Create => format!("New {}", self.entity),
            FormMode::Edit => format!("Edit {}", self.entity),
            FormMode::Action { heading, .. } => heading.to_string(),
        }
    }

    pub(crate) fn render(&self) -> String {
        let (mode, submit) = match self.mode {
            FormMode::Create => ("create", format!("Create {}", self.entity.to_lowercase())),
            FormMode::Edit => ("edit", "Save changes".to_string()),
            FormMode::Action { submit, .. } => ("action", submit.to_string()),
        };
        let mut out = String::new();
        let _ = writeln!(out, "<section class=\"form-view\" data-mode=\"{mode}\">");
        let _ = writeln!(out, "<h1>{}</h1>", escape(&self.heading()));
        if !self.description.is_empty() {
            let _ = writeln!(out, "<p class=\"description\">{}</p>", escape(&self.description));
        }
        if let Some(error) = &self.error {
            let _ = writeln!(out, "<p class=\"form-error\" role=\"alert\">{}</p>", escape(error));
        }
        let _ = writeln!(out, "<form method=\"post\" action=\"{}\">", escape(&self.action));
        for field in &self.fields {
            field.render(&mut out);
        }
        let _ = writeln!(
            out,
            "<button type=\"submit\">{submit}</button> <a href=\"{}\">Cancel</a>",
            escape(&self.cancel_href)
        );
        out.push_str("</form>\n</section>");
        out
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct ListRow {
    /// Pre-rendered cell markup; callers escape their own text.
    pub(crate) cells: Vec<String>,
    pub(crate) edit_href: Option<String>,
    pub(crate) delete_href: Option<String>,
}

#[derive(Debug, Clone)]
pub(crate) struct ListView {
    pub(crate) heading: String,
    pub(crate) new_href: Option<String>,
    pub(crate) columns: Vec<&'static str>,
    pub(crate) rows: Vec<ListRow>,
    pub(crate) empty_text: String,
    pub(crate) notice: Option<String>,
}

impl ListView {
    pub(crate) fn render(&self) -> String {
        let mut out = String::new();
        out.push_str("<section class=\"list-view\">\n");
        let _ = writeln!(out, "<h1>{}</h1>", escape(&self.heading));
        if let Some(href) = &self.new_href {
            let _ = writeln!(out, "<a class=\"button\" href=\"{}\">Add new</a>", escape(href));
        }
        if let Some(notice) = &self.notice {
            let _ = writeln!(out, "<p class=\"notice\" role=\"status\">{}</p>", escape(notice));
        }
        if self.rows.is_empty() {
            let _ = writeln!(out, "<p class=\"empty\">{}</p>", escape(&self.empty_text));
            out.push_str("</section>");
            return out;
        }

        out.push_str("<table>\n<thead><tr>");
        for column in &self.columns {
            let _ = write!(out, "<th>{}</th>", escape(column));
        }
        out.push_str("<th></th></tr></thead>\n<tbody>\n");
        for row in &self.rows {
            out.push_str("<tr>");
            for cell in &row.cells {
                let _ = write!(out, "<td>{cell}</td>");
            }
            out.push_str("<td class=\"actions\">");
            if let Some(href) = &row.edit_href {
                let _ = write!(out, "<a href=\"{}\">Edit</a>", escape(href));
            }
            if let Some(href) = &row.delete_href {
                let _ = write!(
                    out,
                    "<form method=\"post\" action=\"{}\"><button type=\"submit\">Delete</button></form>",
                    escape(href)
                );
            }
            out.push_str("</td></tr>\n");
        }
        out.push_str("</tbody>\n</table>\n</section>");
        out
    }
}

const STAFF_SECTIONS: [(&str, &str); 7] = [
    ("bookings", "Bookings"),
    ("rooms", "Rooms"),
    ("guests", "Guests"),
    ("staff", "Staff"),
    ("activities", "Activities"),
    ("services", "Services"),
    ("messages", "Messages"),
];

/// Sidebar navigation around dashboard content.
pub(crate) fn dashboard_shell(session: &Session, active: &str, content: &str) -> String {
    let mut out = String::from("<div class=\"dashboard\">\n<aside class=\"sidebar\">\n<nav>\n");
    let _ = writeln!(out, "<a href=\"/dashboard\">Overview</a>");
    let sections: &[(&str, &str)] = if session.role.is_staff() {
        &STAFF_SECTIONS
    } else {
        &[("messages", "Messages")]
    };
    for (segment, label) in sections {
        let class = if *segment == active { " class=\"active\"" } else { "" };
        let _ = writeln!(out, "<a{class} href=\"/dashboard/{segment}\">{label}</a>");
    }
    let _ = writeln!(out, "<a href=\"/rooms\">Browse rooms</a>");
    out.push_str("</nav>\n");
    let _ = writeln!(
        out,
        "<p class=\"who\">{} ({})</p>",
        escape(&session.name),
        session.role
    );
    out.push_str(
        "<form method=\"post\" action=\"/logout\"><button type=\"submit\">Sign out</button></form>\n",
    );
    out.push_str("</aside>\n<div class=\"dashboard-content\">\n");
    out.push_str(content);
    out.push_str("\n</div>\n</div>");
    out
}

pub(crate) fn not_found_page() -> String {
    "<!doctype html>\n<html lang=\"en\">\n<head><meta charset=\"utf-8\"><title>Not found | Harbor Hotel</title></head>\n\
     <body><main><h1>Page not found</h1>\
     <p>The page you asked for does not exist or could not be loaded.</p>\
     <p><a href=\"/\">Back to the start</a></p></main></body>\n</html>\n"
        .to_string()
}

#[cfg(test)]
#[path = "tests/views_tests.rs"]
mod tests;
