//! Cross-document views derived from the tracked files.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::collation;
use crate::model::{AnalysisResult, Priority, TrackedFile};

/// Topics across all completed analyses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicIndex {
    pub all_topics: Vec<String>,
    pub high_priority_topics: Vec<String>,
}

fn completed(files: &[TrackedFile]) -> impl Iterator<Item = &AnalysisResult> {
    files.iter().filter(|f| f.is_completed()).filter_map(|f| f.result.as_ref())
}

fn collated(set: BTreeSet<&str>) -> Vec<String> {
    let mut topics: Vec<String> = set.into_iter().map(str::to_string).collect();
    collation::sort(&mut topics);
    topics
}

/// Union of the topics of every completed file, Turkish-collated.
pub fn all_topics(files: &[TrackedFile]) -> Vec<String> {
    collated(
        completed(files)
            .flat_map(|r| r.topics.iter().map(String::as_str))
            .collect(),
    )
}

/// Union of the high-priority study items' topics, Turkish-collated.
pub fn high_priority_topics(files: &[TrackedFile]) -> Vec<String> {
    collated(
        completed(files)
            .flat_map(|r| r.study_plan.iter())
            .filter(|item| item.priority == Priority::High)
            .map(|item| item.topic.as_str())
            .collect(),
    )
}

pub fn topic_index(files: &[TrackedFile]) -> TopicIndex {
    TopicIndex {
        all_topics: all_topics(files),
        high_priority_topics: high_priority_topics(files),
    }
}

/// Whether a roadmap can be generated.
pub fn has_completed(files: &[TrackedFile]) -> bool {
    files.iter().any(TrackedFile::is_completed)
}

/// Results of the completed files, in collection order.
pub fn completed_results(files: &[TrackedFile]) -> Vec<AnalysisResult> {
    completed(files).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FileStatus, StudyItem};

    fn file(id: &str, status: FileStatus, result: Option<AnalysisResult>) -> TrackedFile {
        TrackedFile {
            id: id.to_string(),
            file_name: format!("{}.pdf", id),
            file_size: 1024,
            file_type: "application/pdf".to_string(),
            raw_payload: None,
            status,
            error_message: if status == FileStatus::Error {
                Some("hata".to_string())
            } else {
                None
            },
            result,
            timestamp: 0,
        }
    }

    fn analysis(topics: &[&str], plan: &[(&str, Priority)]) -> AnalysisResult {
        AnalysisResult {
            summary: "özet".to_string(),
            topics: topics.iter().map(|t| t.to_string()).collect(),
            study_plan: plan
                .iter()
                .map(|(topic, priority)| StudyItem {
                    topic: topic.to_string(),
                    action: "çalış".to_string(),
                    priority: *priority,
                })
                .collect(),
        }
    }

    #[test]
    fn test_single_completed_file() {
        let files = vec![file(
            "a",
            FileStatus::Completed,
            Some(analysis(
                &["A", "B"],
                &[("A", Priority::High), ("B", Priority::Medium)],
            )),
        )];

        let index = topic_index(&files);
        assert_eq!(index.all_topics, vec!["A", "B"]);
        assert_eq!(index.high_priority_topics, vec!["A"]);
    }

    #[test]
    fn test_failed_file_is_ignored() {
        let files = vec![
            file("ok", FileStatus::Completed, Some(analysis(&["X"], &[]))),
            file("bad", FileStatus::Error, None),
        ];

        assert_eq!(all_topics(&files), vec!["X"]);
        assert!(high_priority_topics(&files).is_empty());
        assert!(has_completed(&files));
    }

    #[test]
    fn test_only_completed_entries_count() {
        let files = vec![
            file("idle", FileStatus::Idle, None),
            file("busy", FileStatus::Analyzing, None),
        ];
        assert!(!has_completed(&files));
        assert!(completed_results(&files).is_empty());
        assert_eq!(topic_index(&files), TopicIndex::default());
    }

    #[test]
    fn test_union_is_deduplicated_and_collated() {
        let files = vec![
            file(
                "1",
                FileStatus::Completed,
                Some(analysis(
                    &["Türev", "Limit", "Türev"],
                    &[("Türev", Priority::High), ("Limit", Priority::Low)],
                )),
            ),
            file(
                "2",
                FileStatus::Completed,
                Some(analysis(
                    &["Çember", "Limit", "limit"],
                    &[("Çember", Priority::High), ("Türev", Priority::High)],
                )),
            ),
        ];

        let index = topic_index(&files);
        assert_eq!(index.all_topics, vec!["Çember", "limit", "Limit", "Türev"]);
        assert_eq!(index.high_priority_topics, vec!["Çember", "Türev"]);
    }

    #[test]
    fn test_idempotent() {
        let files = vec![file(
            "a",
            FileStatus::Completed,
            Some(analysis(&["B", "A"], &[("B", Priority::High)])),
        )];
        assert_eq!(topic_index(&files), topic_index(&files));
    }

    #[test]
    fn test_completed_results_keep_collection_order() {
        let files = vec![
            file("new", FileStatus::Completed, Some(analysis(&["Yeni"], &[]))),
            file("old", FileStatus::Completed, Some(analysis(&["Eski"], &[]))),
        ];
        let results = completed_results(&files);
        assert_eq!(results[0].topics, vec!["Yeni"]);
        assert_eq!(results[1].topics, vec!["Eski"]);
    }
}
