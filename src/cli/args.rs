use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "examtable",
    version,
    about = "live-synchronized paginated table client for exam dashboards",
    long_about = "Examtable polls an exam-management backend for tabular records, filters them by search text, paginates them under a capped page-button legend, and redraws the table only when the data actually changed.\n\nExamples:\n  examtable -e http://127.0.0.1:8080/post -U 7 -R student\n  examtable -e http://127.0.0.1:8080/post -U 3 -R teacher -l 10\n  examtable --config ~/.examtable/config.yml --once\n\nTip: Use --config to persist connection settings and keep CLI invocations short."
)]
pub struct CliArgs {
    #[arg(
        short = 'e',
        long = "ep",
        visible_alias = "endpoint",
        value_name = "URL",
        help_heading = "Input",
        help = "Backend dispatcher endpoint (e.g. http://host/post)."
    )]
    pub endpoint: Option<String>,

    #[arg(
        short = 'U',
        long = "uid",
        visible_alias = "user-id",
        value_name = "ID",
        help_heading = "Input",
        help = "Viewer identity used for the dashboard query."
    )]
    pub viewer_id: Option<i64>,

    #[arg(
        short = 'R',
        long = "role",
        value_name = "ROLE",
        help_heading = "Input",
        help = "Viewer role: student or teacher."
    )]
    pub role: Option<String>,

    #[arg(
        short = 'C',
        long = "cfg",
        visible_alias = "config",
        value_name = "FILE",
        help_heading = "Input",
        help = "Path to config file (defaults to ~/.examtable/config.yml)."
    )]
    pub config: Option<String>,

    #[arg(
        long = "iv",
        visible_alias = "interval",
        value_name = "MS",
        help_heading = "Polling",
        help = "Poll interval in milliseconds (default 250)."
    )]
    pub poll_interval: Option<u64>,

    #[arg(
        long = "to",
        visible_alias = "timeout",
        value_name = "SECONDS",
        help_heading = "Polling",
        help = "HTTP request timeout in seconds."
    )]
    pub timeout: Option<usize>,

    #[arg(
        short = 'x',
        long = "px",
        visible_alias = "proxy",
        value_name = "URL",
        help_heading = "Polling",
        help = "Route requests through an HTTP proxy."
    )]
    pub proxy: Option<String>,

    #[arg(
        short = 'l',
        long = "pl",
        visible_alias = "page-length",
        value_name = "ROWS",
        help_heading = "Display",
        help = "Rows per page (-1 shows the whole set)."
    )]
    pub page_length: Option<i64>,

    #[arg(
        short = 's',
        long = "sr",
        visible_alias = "search",
        value_name = "TEXT",
        help_heading = "Display",
        help = "Initial search text applied to every poll."
    )]
    pub search: Option<String>,

    #[arg(
        long = "nc",
        visible_alias = "no-color",
        help_heading = "Output",
        help = "Disable colored output."
    )]
    pub no_color: bool,

    #[arg(
        short = '1',
        long = "once",
        help_heading = "Mode",
        help = "Fetch and render a single pass, then exit."
    )]
    pub once: bool,
}
