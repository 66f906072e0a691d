use clap::{Arg, ArgAction, Command, arg, value_parser};

pub const RUN_CMD: &str = "run";

pub fn create_run_cli() -> Command {
    Command::new(RUN_CMD)
        .about("Compute GC and diploid corrected ratios for a reference and/or tumor sample.")
        .arg(
            arg!(--reference <NAME>)
                .required(false)
                .requires("reference-depth")
                .help("Reference (germline) sample name"),
        )
        .arg(
            Arg::new("reference-depth")
                .long("reference-depth")
                .required(false)
                .requires("reference")
                .help("Read depth TSV of the reference sample"),
        )
        .arg(
            arg!(--tumor <NAME>)
                .required(false)
                .requires("tumor-depth")
                .help("Tumor sample name"),
        )
        .arg(
            Arg::new("tumor-depth")
                .long("tumor-depth")
                .required(false)
                .requires("tumor")
                .help("Read depth TSV of the tumor sample"),
        )
        .arg(
            Arg::new("gc-profile")
                .long("gc-profile")
                .required(true)
                .help("GC profile TSV (chromosome, position, gcContent, mappable)"),
        )
        .arg(
            Arg::new("diploid-bed")
                .long("diploid-bed")
                .required(false)
                .help("Diploid regions BED; required in tumor-only mode"),
        )
        .arg(
            Arg::new("target-regions")
                .long("target-regions")
                .required(false)
                .help("Target enrichment TSV for panel data"),
        )
        .arg(
            Arg::new("output-dir")
                .long("output-dir")
                .short('o')
                .required(true)
                .help("Directory the ratio table and side files are written to"),
        )
        .arg(
            arg!(--config <TOML>)
                .required(false)
                .help("TOML file with tuning parameters; flags below override it"),
        )
        .arg(
            arg!(--threads <THREADS>)
                .required(false)
                .value_parser(value_parser!(usize))
                .help("Worker threads"),
        )
        .arg(
            Arg::new("gc-bucket-min")
                .long("gc-bucket-min")
                .required(false)
                .value_parser(value_parser!(u8))
                .help("Lowest GC percentage used for the GC model"),
        )
        .arg(
            Arg::new("gc-bucket-max")
                .long("gc-bucket-max")
                .required(false)
                .value_parser(value_parser!(u8))
                .help("Highest GC percentage used for the GC model"),
        )
        .arg(
            Arg::new("max-window-distance")
                .long("max-window-distance")
                .required(false)
                .value_parser(value_parser!(usize))
                .help("Half width of the diploid median window, in windows"),
        )
        .arg(
            Arg::new("min-window-coverage")
                .long("min-window-coverage")
                .required(false)
                .value_parser(value_parser!(usize))
                .help("Valid ratios a diploid median window needs before it is applied"),
        )
        .arg(
            Arg::new("no-compress")
                .long("no-compress")
                .action(ArgAction::SetTrue)
                .help("Write the ratio table uncompressed"),
        )
        .arg(
            arg!(--segmenter <PROGRAM>)
                .required(false)
                .help("Segmentation program, called as <PROGRAM> [ARGS] <ratio file> <column> <output>"),
        )
        .arg(
            Arg::new("segmenter-arg")
                .long("segmenter-arg")
                .required(false)
                .requires("segmenter")
                .action(ArgAction::Append)
                .allow_hyphen_values(true)
                .help("Argument passed to the segmentation program ahead of the job arguments"),
        )
}
