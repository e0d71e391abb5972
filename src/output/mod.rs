pub mod formatter;

pub use formatter::{
    format_age, format_json, format_pr_table, format_stats, format_tsv, should_use_colors,
};
