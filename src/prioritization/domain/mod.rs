//! Pure policies for re-prioritization: candidate selection and rank merge.

mod candidate;
mod merge;

pub use candidate::{CandidatePolicy, RankingCandidate, select_candidates};
pub use merge::{MergeReport, PriorityMerge, RankLookup, merge_priorities};
