use clap::{Arg, ArgAction, Command, arg, value_parser};

pub const SEGMENT_CMD: &str = "segment";

pub fn create_segment_cli() -> Command {
    Command::new(SEGMENT_CMD)
        .about("Segment the ratio columns of an existing cobalt ratio table.")
        .arg(
            Arg::new("ratio-file")
                .long("ratio-file")
                .required(true)
                .help("Ratio table written by `cobalt run`"),
        )
        .arg(
            Arg::new("output-dir")
                .long("output-dir")
                .short('o')
                .required(true)
                .help("Directory the segment files are written to"),
        )
        .arg(arg!(--reference <NAME>).required(false).help("Reference sample name"))
        .arg(arg!(--tumor <NAME>).required(false).help("Tumor sample name"))
        .arg(
            arg!(--segmenter <PROGRAM>)
                .required(true)
                .help("Segmentation program, called as <PROGRAM> [ARGS] <ratio file> <column> <output>"),
        )
        .arg(
            Arg::new("segmenter-arg")
                .long("segmenter-arg")
                .required(false)
                .action(ArgAction::Append)
                .allow_hyphen_values(true)
                .help("Argument passed to the segmentation program ahead of the job arguments"),
        )
        .arg(
            arg!(--threads <THREADS>)
                .required(false)
                .default_value("2")
                .value_parser(value_parser!(usize))
                .help("Worker threads"),
        )
}
