use std::fmt::Write;

use chrono::Duration;
use natter_client::{
    api::{Comment, Time},
    CommentWidget,
};

pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Renders `then` relative to `now`, eg. "3 minutes ago" or "in a day"
pub fn relative_time(then: Time, now: Time) -> String {
    let delta = now.signed_duration_since(then);
    let future = delta < Duration::zero();
    let secs = delta.num_seconds().abs();
    let (mins, hours, days) = (secs / 60, secs / 3600, secs / 86400);
    let amount = match () {
        _ if secs < 45 => String::from("a few seconds"),
        _ if secs < 90 => String::from("a minute"),
        _ if mins < 45 => format!("{} minutes", round_div(secs, 60)),
        _ if mins < 90 => String::from("an hour"),
        _ if hours < 22 => format!("{} hours", round_div(secs, 3600)),
        _ if hours < 36 => String::from("a day"),
        _ if days < 26 => format!("{} days", round_div(secs, 86400)),
        _ if days < 45 => String::from("a month"),
        _ if days < 320 => format!("{} months", round_div(days, 30)),
        _ if days < 548 => String::from("a year"),
        _ => format!("{} years", round_div(days, 365)),
    };
    match future {
        true => format!("in {amount}"),
        false => format!("{amount} ago"),
    }
}

fn round_div(n: i64, d: i64) -> i64 {
    (n + d / 2) / d
}

/// Lists all the threads of `w`, newest first, one comment per line
pub fn render(w: &CommentWidget, now: Time) -> String {
    let mut res = String::new();
    for thread in w.store().list_ordered() {
        thread.walk(0, &mut |depth, c: &Comment| {
            let marker = match (w.is_editing(&c.id), w.is_reply_open(&c.id)) {
                (true, _) => " [editing]",
                (false, true) => " [replying]",
                (false, false) => "",
            };
            // writing to a String cannot fail
            let _ = writeln!(
                res,
                "{:indent$}{} {}  ({}, {}){}",
                "",
                c.id,
                c.content,
                c.created_at.format(DATE_FORMAT),
                relative_time(c.created_at, now),
                marker,
                indent = depth * 2,
            );
        });
    }
    res
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use natter_client::{Config, IdScheme};

    use super::*;

    #[test]
    fn relative_times() {
        let now = Utc::now();
        let ago = |d: Duration| relative_time(now - d, now);
        assert_eq!(ago(Duration::seconds(3)), "a few seconds ago");
        assert_eq!(ago(Duration::seconds(60)), "a minute ago");
        assert_eq!(ago(Duration::minutes(10)), "10 minutes ago");
        assert_eq!(ago(Duration::minutes(60)), "an hour ago");
        assert_eq!(ago(Duration::hours(5)), "5 hours ago");
        assert_eq!(ago(Duration::hours(30)), "a day ago");
        assert_eq!(ago(Duration::days(3)), "3 days ago");
        assert_eq!(ago(Duration::days(30)), "a month ago");
        assert_eq!(ago(Duration::days(90)), "3 months ago");
        assert_eq!(ago(Duration::days(400)), "a year ago");
        assert_eq!(ago(Duration::days(800)), "2 years ago");
        assert_eq!(relative_time(now + Duration::days(1), now), "in a day");
    }

    #[test]
    fn render_indents_replies() {
        let mut w = CommentWidget::with_config(Config {
            id_scheme: IdScheme::Sequential,
        });
        let root = w.post("root").unwrap();
        w.toggle_reply(&root.id).unwrap();
        w.set_reply_draft(&root.id, "reply").unwrap();
        let reply = w.submit_reply(&root.id).unwrap();
        w.begin_edit(&reply.id).unwrap();
        w.toggle_reply(&root.id).unwrap();

        let now = Utc::now();
        let lines = render(&w, now)
            .lines()
            .map(String::from)
            .collect::<Vec<_>>();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("#1 root  ("), "{}", lines[0]);
        assert!(lines[0].ends_with("a few seconds ago) [replying]"), "{}", lines[0]);
        assert!(lines[1].starts_with("  #2 reply  ("), "{}", lines[1]);
        assert!(lines[1].ends_with(" [editing]"), "{}", lines[1]);
    }

    #[test]
    fn absolute_date_format() {
        let t = Utc.with_ymd_and_hms(2023, 4, 5, 6, 7, 8).unwrap();
        assert_eq!(t.format(DATE_FORMAT).to_string(), "2023-04-05 06:07:08");
    }
}
