use clap::ValueEnum;

pub mod commands;

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// `mean stddev stddev` groups, one line per comparison
    #[default]
    Line,
    /// Labelled, human readable breakdown
    Pretty,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Line => "line",
            OutputFormat::Pretty => "pretty",
        }
    }
}
