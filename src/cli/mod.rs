pub mod add;
pub mod date;
pub mod report;

use std::{io::Write, path::PathBuf};

use add::{process_add_command, AddCommand};
use anyhow::Result;
use clap::{Parser, Subcommand};
use report::{
    process_records_command, process_subject_command, process_subjects_command,
    process_trend_command, RecordsCommand, SubjectCommand, TrendCommand,
};
use tracing::{debug, level_filters::LevelFilter};

use crate::{
    storage::record_storage::{CsvRecordStorage, RecordStorage},
    utils::{
        clock::{Clock, DefaultClock},
        dir::{create_application_default_path, create_application_path, record_file_path},
        logging::{enable_logging, CLI_PREFIX},
    },
};

#[derive(Parser, Debug)]
#[command(name = "Study Planner", version, long_about = None)]
#[command(about = "Track your study time, analyze focus, and improve consistency", long_about = None)]
struct Args {
    #[command(subcommand)]
    commands: Commands,
    #[arg(
        long,
        global = true,
        help = "Application directory. By default tries to save into $XDG_STATE_HOME or $HOME/.local/state"
    )]
    dir: Option<PathBuf>,
    #[arg(
        long,
        global = true,
        help = "Record file. By default study_data.csv inside the application directory"
    )]
    file: Option<PathBuf>,
    #[arg(long, global = true, help = "Enable logging")]
    log: bool,
}

#[derive(Subcommand, Debug)]
#[command(version, about, long_about = None)]
enum Commands {
    #[command(about = "Add a study record")]
    Add {
        #[command(flatten)]
        command: AddCommand,
    },
    #[command(about = "Display all study records")]
    Records {
        #[command(flatten)]
        command: RecordsCommand,
    },
    #[command(about = "Display hours per subject for the last 7 days")]
    Trend {
        #[command(flatten)]
        command: TrendCommand,
    },
    #[command(about = "Display total hours of a subject and its contribution")]
    Subject {
        #[command(flatten)]
        command: SubjectCommand,
    },
    #[command(about = "List recorded subjects")]
    Subjects {},
}

pub fn run_cli() -> Result<()> {
    let args = Args::parse();

    let application_dir = args
        .dir
        .map_or_else(create_application_default_path, create_application_path)?;

    let logging_level = if args.log {
        Some(LevelFilter::TRACE)
    } else {
        None
    };
    enable_logging(CLI_PREFIX, &application_dir, logging_level, args.log)?;

    let record_file = args
        .file
        .unwrap_or_else(|| record_file_path(&application_dir));
    debug!("Using record file {record_file:?}");
    let storage = CsvRecordStorage::new(record_file)?;

    let mut stdout = std::io::stdout().lock();
    execute(args.commands, &storage, &DefaultClock, &mut stdout)
}

fn execute(
    commands: Commands,
    storage: &impl RecordStorage,
    clock: &dyn Clock,
    out: &mut impl Write,
) -> Result<()> {
    match commands {
        Commands::Add { command } => process_add_command(command, storage, clock, out),
        Commands::Records { command } => process_records_command(command, storage, out),
        Commands::Trend { command } => process_trend_command(command, storage, clock, out),
        Commands::Subject { command } => process_subject_command(command, storage, out),
        Commands::Subjects {} => process_subjects_command(storage, out),
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use chrono::{Local, TimeZone};
    use clap::{CommandFactory, Parser};
    use tempfile::tempdir;

    use crate::{
        storage::record_storage::{CsvRecordStorage, RecordStorage},
        utils::clock::MockClock,
    };

    use super::{execute, Args};

    #[test]
    fn verify_cli() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_add_then_report() -> Result<()> {
        let dir = tempdir()?;
        let storage = CsvRecordStorage::new(dir.path().join("study_data.csv"))?;
        let mut clock = MockClock::new();
        clock
            .expect_now()
            .returning(|| Local.with_ymd_and_hms(2024, 1, 2, 18, 0, 0).unwrap());

        let commands: [&[&str]; 3] = [
            &["study-planner", "add", "-s", "Math", "--hours", "2", "-d", "01/01/2024"],
            &["study-planner", "add", "-s", "Physics", "--hours", "1", "-d", "01/01/2024"],
            &["study-planner", "add", "-s", "Math", "--hours", "1.5"],
        ];
        for command in commands {
            execute(Args::parse_from(command).commands, &storage, &clock, &mut Vec::new())?;
        }
        assert_eq!(storage.load()?.len(), 3);

        let mut out = Vec::new();
        execute(
            Args::parse_from(["study-planner", "subject", "Math"]).commands,
            &storage,
            &clock,
            &mut out,
        )?;
        let output = String::from_utf8(out)?;
        assert!(output.contains("Total Hours: 3.5"));
        assert!(output.contains("1.0"));

        let mut out = Vec::new();
        execute(
            Args::parse_from(["study-planner", "subjects"]).commands,
            &storage,
            &clock,
            &mut out,
        )?;
        assert_eq!(String::from_utf8(out)?, "Math\nPhysics\n");
        Ok(())
    }

    #[test]
    fn test_global_options_after_subcommand() {
        let args = Args::parse_from(["study-planner", "records", "--file", "data.csv", "--log"]);

        assert_eq!(args.file.as_deref(), Some(std::path::Path::new("data.csv")));
        assert!(args.log);
    }
}
