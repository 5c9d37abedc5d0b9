//! Raw warehouse tables and their file contract.
//!
//! The CSV files written by [`DatasetWriter`](crate::export::DatasetWriter)
//! and read by [`RawLoader`](crate::db::RawLoader) share the column lists
//! declared here.

/// Warehouse schema holding the untransformed tables.
pub const RAW_SCHEMA: &str = "raw";

/// One of the six raw tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RawTable {
    Users,
    Content,
    Sessions,
    UserContentEvents,
    Categories,
    ContentCategory,
}

impl RawTable {
    /// All tables, in load order.
    pub const ALL: [RawTable; 6] = [
        RawTable::Users,
        RawTable::Content,
        RawTable::Sessions,
        RawTable::UserContentEvents,
        RawTable::Categories,
        RawTable::ContentCategory,
    ];

    /// Unqualified table name.
    pub fn name(&self) -> &'static str {
        match self {
            RawTable::Users => "users",
            RawTable::Content => "content",
            RawTable::Sessions => "sessions",
            RawTable::UserContentEvents => "user_content_events",
            RawTable::Categories => "categories",
            RawTable::ContentCategory => "content_category",
        }
    }

    /// Schema-qualified table name, e.g. `raw.users`.
    pub fn qualified_name(&self) -> String {
        format!("{RAW_SCHEMA}.{}", self.name())
    }

    /// Input/output file name inside the data directory.
    pub fn file_name(&self) -> String {
        format!("{}.csv", self.name())
    }

    /// Column list, in file header order.
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            RawTable::Users => &[
                "user_id",
                "signup_ts",
                "country",
                "marketing_channel",
                "fav_sport",
            ],
            RawTable::Content => &[
                "content_id",
                "content_title",
                "publish_ts",
                "content_type",
                "author_id",
                "content_url",
            ],
            RawTable::Sessions => &[
                "session_id",
                "user_id",
                "session_start_ts",
                "platform_type",
                "country",
                "state_province",
                "city",
            ],
            RawTable::UserContentEvents => &[
                "event_id",
                "user_id",
                "session_id",
                "content_id",
                "event_ts",
                "event_type",
                "time_spent_seconds",
                "scroll_count",
                "completion_pct",
                "completed_flag",
                "live_game_flag",
                "major_tournament_flag",
            ],
            RawTable::Categories => &[
                "category_id",
                "category_name",
                "category_level",
                "parent_category_id",
                "category_desc",
            ],
            RawTable::ContentCategory => &[
                "content_id",
                "category_id",
                "relationship_type",
                "source",
                "confidence_score",
                "attribution_weight",
            ],
        }
    }

    /// `TRUNCATE` statement for this table.
    pub fn truncate_sql(&self) -> String {
        format!("TRUNCATE TABLE {}", self.qualified_name())
    }

    /// `COPY ... FROM STDIN` statement with an explicit column list.
    pub fn copy_sql(&self) -> String {
        format!(
            "COPY {} ({}) FROM STDIN WITH (FORMAT csv, HEADER true)",
            self.qualified_name(),
            self.columns().join(", ")
        )
    }
}
