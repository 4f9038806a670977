use clap::Parser;

/// This is a checking program for orienteering punch results.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) The configuration file with the checking rules and the race file
    /// sources, in JSON format. For more information about the file format, read the documentation.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,
    /// (file path) A reference file containing the summary of a checked race in JSON format.
    /// If provided, sorgcheck will check that the computed summary matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the summary of the checked race will be
    /// written in JSON format to the given location. Setting this option overrides the output
    /// directory that may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) The race description in JSON format. Setting this option adds the file to
    /// the sources that may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (file path) A backup log of card readouts, as appended by a readout station. The
    /// readouts are merged into the race by card number.
    #[clap(long, value_parser)]
    pub readout: Option<String>,

    /// (file path) A CSV file of finish times per bib. The times are merged into the race.
    #[clap(long, value_parser)]
    pub times: Option<String>,

    /// If passed as an argument, results holding a missing punch status are retried against
    /// the courses of all groups and moved to the first group whose course they satisfy.
    #[clap(long, takes_value = false)]
    pub recover_groups: bool,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
