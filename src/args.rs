use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use product_harvest::export::ExportFormat;
use product_harvest::{Field, FieldSelection};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "product-harvest")]
#[command(about = "Collects product tiles from marketplace search results and extracts them into a table")]
#[command(version)]
pub struct Args {
    /// Path to a JSON configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Save product fragments from search result pages
    Collect(CollectArgs),

    /// Parse saved fragments into a product table
    Extract(ExtractArgs),

    /// Collect, then extract
    Run {
        #[command(flatten)]
        collect: CollectArgs,

        #[command(flatten)]
        extract: ExtractOptions,
    },
}

#[derive(ClapArgs, Debug)]
pub struct CollectArgs {
    /// Search keyword
    pub keyword: String,

    /// Number of result pages to visit
    #[arg(short, long, default_value_t = 5)]
    pub pages: usize,

    /// Directory fragments are written to
    #[arg(short, long, default_value = "data")]
    pub data_dir: PathBuf,

    /// WebDriver server URL (overrides config and WEBDRIVER_URL)
    #[arg(long)]
    pub webdriver_url: Option<String>,

    /// Keep going when a page fails to load
    #[arg(long)]
    pub skip_failed_pages: bool,
}

#[derive(ClapArgs, Debug)]
pub struct ExtractArgs {
    /// Directory to read fragments from
    #[arg(short, long, default_value = "data")]
    pub data_dir: PathBuf,

    /// Only read files saved for this keyword
    #[arg(short, long)]
    pub keyword: Option<String>,

    #[command(flatten)]
    pub options: ExtractOptions,
}

#[derive(ClapArgs, Debug)]
pub struct ExtractOptions {
    /// Fields not to extract (records then never count as complete)
    #[arg(long, value_enum, value_delimiter = ',')]
    pub skip: Vec<FieldArg>,

    /// Table format
    #[arg(short, long, value_enum, default_value_t = FormatArg::Csv)]
    pub format: FormatArg,

    /// Table output path (stdout if omitted; spreadsheets default to
    /// `<keyword>_products.xlsx`)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Write the extraction statistics as JSON to this path
    #[arg(long)]
    pub stats: Option<PathBuf>,
}

impl ExtractOptions {
    pub fn fields(&self) -> FieldSelection {
        self.skip
            .iter()
            .fold(FieldSelection::default(), |fields, skip| fields.without((*skip).into()))
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum FieldArg {
    Name,
    Price,
    Rating,
    Link,
    Image,
}

impl From<FieldArg> for Field {
    fn from(arg: FieldArg) -> Self {
        match arg {
            FieldArg::Name => Field::Name,
            FieldArg::Price => Field::Price,
            FieldArg::Rating => Field::Rating,
            FieldArg::Link => Field::Link,
            FieldArg::Image => Field::Image,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Csv,
    Tsv,
    Json,
    Xlsx,
}

impl From<FormatArg> for ExportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Csv => ExportFormat::Csv,
            FormatArg::Tsv => ExportFormat::Tsv,
            FormatArg::Json => ExportFormat::Json,
            FormatArg::Xlsx => ExportFormat::Xlsx,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_skip_list() {
        let args = Args::parse_from(["product-harvest", "extract", "--skip", "price,image"]);
        let Command::Extract(extract) = args.command else {
            panic!("expected extract");
        };
        let fields = extract.options.fields();
        assert!(fields.name);
        assert!(!fields.price);
        assert!(!fields.image);
        assert_eq!(extract.data_dir, PathBuf::from("data"));
    }

    #[test]
    fn test_run_defaults() {
        let args = Args::parse_from(["product-harvest", "run", "red shoes", "-p", "2"]);
        let Command::Run { collect, extract } = args.command else {
            panic!("expected run");
        };
        assert_eq!(collect.keyword, "red shoes");
        assert_eq!(collect.pages, 2);
        assert_eq!(extract.format, FormatArg::Csv);
        assert_eq!(extract.fields(), FieldSelection::default());
    }

    #[test]
    fn test_xlsx_format() {
        let args = Args::parse_from(["product-harvest", "extract", "-k", "phone", "-f", "xlsx"]);
        let Command::Extract(extract) = args.command else {
            panic!("expected extract");
        };
        assert_eq!(extract.options.format, FormatArg::Xlsx);
        assert_eq!(ExportFormat::from(extract.options.format), ExportFormat::Xlsx);
        assert!(extract.options.output.is_none());
    }
}
