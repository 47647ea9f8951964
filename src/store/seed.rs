use chrono::{Duration, SecondsFormat, Utc};

use super::MemoRow;
use crate::domain::memo::MemoId;

pub(super) fn sample_rows() -> Vec<MemoRow> {
    let now = Utc::now();
    let hour_ago = now - Duration::hours(1);
    let now = now.to_rfc3339_opts(SecondsFormat::Millis, true);
    let hour_ago = hour_ago.to_rfc3339_opts(SecondsFormat::Millis, true);

    vec![
        MemoRow {
            id: MemoId::new().as_str().to_string(),
            title: "Welcome to memodeck".to_string(),
            content: "Memos now live in the shared **memos** table.\n\n\
                      - `n` writes a new memo\n- `Enter` opens one\n- `/` searches"
                .to_string(),
            category: "work".to_string(),
            tags: vec![
                "memodeck".to_string(),
                "setup".to_string(),
                "database".to_string(),
            ],
            created_at: now.clone(),
            updated_at: now,
        },
        MemoRow {
            id: MemoId::new().as_str().to_string(),
            title: "Reading plan".to_string(),
            content: "# This week\n\nOwnership, traits and async in depth.".to_string(),
            category: "study".to_string(),
            tags: vec![
                "rust".to_string(),
                "learning".to_string(),
            ],
            created_at: hour_ago.clone(),
            updated_at: hour_ago,
        },
    ]
}
