//! Server-rendered admin page.

use html_escape::encode_text;
use spotlight_core::store::{RunResult, Schedule};

pub const EMPTY_PLACEHOLDER: &str = "No products have been marked as featured yet.";

const SCRIPT: &str = r#"
document.getElementById("run-featured").addEventListener("click", function () {
    var button = this;
    var message = document.getElementById("run-message");
    button.disabled = true;
    message.textContent = "Running...";
    fetch("/api/rotation/run", { method: "POST", credentials: "same-origin" })
        .then(function (response) { return response.json(); })
        .then(function (data) {
            message.textContent = data.message;
            location.reload();
        })
        .catch(function (err) {
            message.textContent = "Request failed: " + err;
            button.disabled = false;
        });
});
"#;

/// Render the admin page for the current run result and schedule.
pub fn render(result: &RunResult, schedule: Option<&Schedule>) -> String {
    let mut html = String::with_capacity(2048);
    html.push_str(concat!(
        "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\">",
        "<title>Auto-Featured Products</title></head>\n",
        "<body style=\"font-family:sans-serif;padding:2rem\">\n",
        "<div class=\"wrap\">\n",
        "<h1>Auto-Featured Products</h1>\n",
        "<p>Click the button below to run the rotation manually.</p>\n",
        "<button id=\"run-featured\" type=\"button\">Run manually</button>\n",
        "<div id=\"run-message\" style=\"margin-top:10px\"></div>\n",
    ));

    html.push_str("<p id=\"run-status\">");
    html.push_str(&status_line(result, schedule));
    html.push_str("</p>\n");

    html.push_str("<h2>Most Recently Featured Products:</h2>\n<ul id=\"featured-list\">\n");
    if result.titles.is_empty() {
        html.push_str("<li>");
        html.push_str(EMPTY_PLACEHOLDER);
        html.push_str("</li>\n");
    } else {
        for title in &result.titles {
            html.push_str("<li>");
            html.push_str(&encode_text(title));
            html.push_str("</li>\n");
        }
    }
    html.push_str("</ul>\n</div>\n<script>");
    html.push_str(SCRIPT);
    html.push_str("</script>\n</body></html>\n");
    html
}

fn status_line(result: &RunResult, schedule: Option<&Schedule>) -> String {
    let last = match (result.ran_at, result.trigger) {
        (Some(at), Some(trigger)) => {
            format!("Last run: {} ({trigger}).", at.format("%Y-%m-%d %H:%M UTC"))
        }
        (Some(at), None) => format!("Last run: {}.", at.format("%Y-%m-%d %H:%M UTC")),
        _ => "Not run yet.".to_string(),
    };
    let next = match schedule {
        Some(s) => format!(
            " Next scheduled run: {}.",
            s.next_run_at.format("%Y-%m-%d %H:%M UTC")
        ),
        None => " Schedule is not active.".to_string(),
    };
    format!("{last}{next}")
}
