//! Page rendering and content-type negotiation.
//!
//! Pure presentation: consumes a [`RequestOutcome`] and produces markup.
//! Nothing here touches the workspace or the comparator.

use crate::errors::RequestOutcome;
use http::header::ACCEPT;
use http::HeaderMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageFormat {
    Xhtml,
    Html,
}

impl PageFormat {
    pub fn content_type(self) -> &'static str {
        match self {
            PageFormat::Xhtml => "application/xhtml+xml; charset=UTF-8",
            PageFormat::Html => "text/html; charset=UTF-8",
        }
    }
}

/// XHTML when the client advertises it, plain HTML otherwise.
pub fn negotiate(headers: &HeaderMap) -> PageFormat {
    let accept = headers
        .get(ACCEPT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    if accept.to_ascii_lowercase().contains("application/xhtml+xml") {
        PageFormat::Xhtml
    } else {
        PageFormat::Html
    }
}

pub fn escape(text: &str) -> String {
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

/// Render the form page, with the outcome section when a POST produced one.
pub fn page(outcome: Option<&RequestOutcome>, format: PageFormat) -> String {
    let mut body = String::new();
    if format == PageFormat::Xhtml {
        body.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\" ?>");
    }
    body.push_str(concat!(
        "<!DOCTYPE html>\n",
        "<html lang=\"en\" xmlns=\"http://www.w3.org/1999/xhtml\" xml:lang=\"en\">\n",
        "<head>\n",
        "<title>Document Comparator</title>\n",
        "</head>\n",
        "<body>\n",
        "<h1>Document Comparator</h1>\n",
        "<p class=\"lead\">Upload an actual-state and a planned-state document ",
        "to list the differences between them.</p>\n",
        "<p>Uploaded files are kept only while the request is processed and ",
        "are deleted before the result page is returned.</p>\n",
    ));

    if let Some(RequestOutcome::Success(entries)) = outcome {
        body.push_str("<h3>Results</h3>\n<ul>\n");
        if entries.is_empty() {
            body.push_str("<li style=\"font-style: italic;\">No differences found.</li>\n");
        } else {
            for entry in entries {
                body.push_str("<li>");
                body.push_str(&escape(entry));
                body.push_str("</li>\n");
            }
        }
        body.push_str("</ul>\n");
    }

    body.push_str("<h3>Compare documents</h3>\n");
    match outcome {
        Some(RequestOutcome::ValidationFailure { message })
        | Some(RequestOutcome::ExecutionFailure { message, .. }) => {
            body.push_str("<p class=\"warning\">");
            body.push_str(&escape(message));
            body.push_str("</p>\n");
        }
        _ => {}
    }

    body.push_str(concat!(
        "<form>\n",
        "<p>\n",
        "<label for=\"actual-state\">Actual state*</label>\n",
        "<input name=\"actual-state\" id=\"actual-state\" required=\"true\" type=\"file\" />\n",
        "</p>\n",
        "<p>\n",
        "<label for=\"planned-state\">Planned state*</label>\n",
        "<input name=\"planned-state\" id=\"planned-state\" required=\"true\" type=\"file\" />\n",
        "</p>\n",
        "<p>\n",
        "<input formenctype=\"multipart/form-data\" formmethod=\"post\" ",
        "type=\"submit\" value=\"Compare\" />\n",
        "</p>\n",
        "</form>\n",
        "</body>\n",
        "</html>\n",
    ));
    body
}
