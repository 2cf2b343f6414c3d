//! Chicago Public Schools progress report cards, 2011-2012.
//!
//! Column names are matched verbatim, including the trailing spaces some of
//! them carry in the published file header.

use crate::data::TableSchema;

pub const DEFAULT_DATA_FILE: &str =
    "Chicago_Public_Schools_-_Progress_Report_Cards__2011-2012_.csv";

pub const NETWORK_MANAGER: &str = "Network Manager";
pub const ENVIRONMENT_SCORE: &str = "Environment Score";
pub const SAFETY_SCORE: &str = "Safety Score";

pub const PARENT_ENGAGEMENT_ICON: &str = "Parent Engagement Icon ";
pub const PARENT_ENVIRONMENT_ICON: &str = "Parent Environment Icon";
pub const ADEQUATE_YEARLY_PROGRESS: &str = "Adequate Yearly Progress Made? ";
pub const PERFORMANCE_POLICY_LEVEL: &str = "CPS Performance Policy Level";

pub const INSTRUCTION_SCORE: &str = "Instruction Score";
pub const COLLEGE_ENROLLMENT_RATE: &str = "College Enrollment Rate %";

/// Columns read by the bar chart.
pub fn bar_schema() -> TableSchema {
    TableSchema::new()
        .categorical(NETWORK_MANAGER)
        .numeric(ENVIRONMENT_SCORE)
        .numeric(SAFETY_SCORE)
}
