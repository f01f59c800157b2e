/// Reaction aggregation over one page of event reports
///
/// The total comes from the response metadata, which counts every matching
/// report and not only those in the fetched page.
use super::types::ReactionCount;
use crate::apis::openfda::types::EventSearchResponse;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggregation {
    pub total: u64,
    pub top_reactions: Vec<ReactionCount>,
}

/// Summarize a search response into its total and top `limit` reactions
pub fn aggregate(response: &EventSearchResponse, limit: usize) -> Aggregation {
    let labels = response
        .results
        .iter()
        .flat_map(|event| event.patient.reaction.iter())
        .filter_map(|reaction| reaction.label.as_deref());

    Aggregation {
        total: response.meta.results.total,
        top_reactions: count_reactions(labels, limit),
    }
}

/// Count labels, most frequent first, keeping at most `limit` entries
///
/// Labels are compared exactly. Equal counts keep first-seen order.
/// Empty labels are skipped.
pub fn count_reactions<'a, I>(labels: I, limit: usize) -> Vec<ReactionCount>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut positions: HashMap<&'a str, usize> = HashMap::new();
    let mut counts: Vec<ReactionCount> = Vec::new();

    for label in labels {
        if label.is_empty() {
            continue;
        }
        match positions.get(label) {
            Some(&index) => counts[index].count += 1,
            None => {
                positions.insert(label, counts.len());
                counts.push(ReactionCount::new(label, 1));
            }
        }
    }

    // Stable sort keeps first-seen order among ties
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(limit);
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apis::openfda::types::{
        AdverseEvent, EventMeta, Patient, PatientReaction, ResultsMeta,
    };

    fn event(labels: &[&str]) -> AdverseEvent {
        AdverseEvent {
            patient: Patient {
                reaction: labels
                    .iter()
                    .map(|l| PatientReaction {
                        label: Some(l.to_string()),
                    })
                    .collect(),
            },
        }
    }

    fn response(total: u64, events: Vec<AdverseEvent>) -> EventSearchResponse {
        EventSearchResponse {
            meta: EventMeta {
                results: ResultsMeta {
                    skip: 0,
                    limit: events.len() as u64,
                    total,
                },
            },
            results: events,
        }
    }

    #[test]
    fn test_groups_and_sorts_by_count() {
        let top = count_reactions(["BLEEDING", "BLEEDING", "NAUSEA"], 2);
        assert_eq!(
            top,
            vec![ReactionCount::new("BLEEDING", 2), ReactionCount::new("NAUSEA", 1)]
        );
    }

    #[test]
    fn test_truncates_to_limit() {
        let top = count_reactions(["A", "B", "C", "D", "E"], 3);
        assert_eq!(top.len(), 3);
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let top = count_reactions(["RASH", "NAUSEA", "HEADACHE", "NAUSEA", "RASH"], 10);
        let order: Vec<&str> = top.iter().map(|r| r.reaction.as_str()).collect();
        assert_eq!(order, vec!["RASH", "NAUSEA", "HEADACHE"]);
    }

    #[test]
    fn test_labels_are_case_sensitive() {
        let top = count_reactions(["Nausea", "NAUSEA"], 10);
        assert_eq!(top.len(), 2);
    }

    #[test]
    fn test_zero_limit_is_empty() {
        assert!(count_reactions(["A", "A"], 0).is_empty());
    }

    #[test]
    fn test_total_comes_from_metadata() {
        let result = aggregate(&response(157, vec![event(&["BLEEDING"])]), 50);
        assert_eq!(result.total, 157);
        assert_eq!(result.top_reactions, vec![ReactionCount::new("BLEEDING", 1)]);
    }

    #[test]
    fn test_flattens_across_events() {
        let events = vec![event(&["BLEEDING", "NAUSEA"]), event(&["BLEEDING"]), event(&[])];
        let result = aggregate(&response(3, events), 50);
        assert_eq!(
            result.top_reactions,
            vec![ReactionCount::new("BLEEDING", 2), ReactionCount::new("NAUSEA", 1)]
        );
    }

    #[test]
    fn test_empty_page_keeps_total() {
        let result = aggregate(&response(12, Vec::new()), 50);
        assert_eq!(result.total, 12);
        assert!(result.top_reactions.is_empty());
    }

    #[test]
    fn test_unlabeled_reactions_are_skipped() {
        let mut unlabeled = event(&["DIZZINESS"]);
        unlabeled.patient.reaction.push(PatientReaction { label: None });
        let result = aggregate(&response(1, vec![unlabeled]), 50);
        assert_eq!(result.top_reactions, vec![ReactionCount::new("DIZZINESS", 1)]);
    }
}
