use std::{env, fs::read_to_string, path::PathBuf, process::ExitCode, time::Instant};

use semant::{
    ast::ast::Program,
    errors::errors::{Phase, SemantError},
    type_checker::type_checker::type_check,
};

const EXIT_SEMANTIC_ERRORS: u8 = 1;
const EXIT_BAD_INPUT: u8 = 2;

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!("usage: {} <program.json>", args.first().map_or("semant", String::as_str));
        return ExitCode::from(EXIT_BAD_INPUT);
    }

    let file_path = PathBuf::from(&args[1]);
    let file_contents = match read_to_string(&file_path) {
        Ok(contents) => contents,
        Err(error) => {
            eprintln!("Failed to read {}: {}", file_path.display(), error);
            return ExitCode::from(EXIT_BAD_INPUT);
        }
    };

    let mut program: Program = match serde_json::from_str(&file_contents) {
        Ok(program) => program,
        Err(error) => {
            eprintln!("Failed to decode {}: {}", file_path.display(), error);
            return ExitCode::from(EXIT_BAD_INPUT);
        }
    };

    let start = Instant::now();
    let result = type_check(&mut program);
    log::debug!("Type checked in {:?}", start.elapsed());

    if let Err(error) = result {
        if error.phase == Phase::Input {
            eprint!("{}", error.render());
            eprintln!("Malformed expression tree in {}.", file_path.display());
            return ExitCode::from(EXIT_BAD_INPUT);
        }
        display_errors(&error);
        return ExitCode::from(EXIT_SEMANTIC_ERRORS);
    }

    match serde_json::to_string_pretty(&program) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(error) => {
            eprintln!("Failed to encode the annotated program: {}", error);
            ExitCode::from(EXIT_BAD_INPUT)
        }
    }
}

fn display_errors(error: &SemantError) {
    /*
        hello.cl:4: Undeclared identifier y.
        hello.cl:9: Loop condition does not have type Bool.
        Compilation halted due to static semantic errors.
    */
    eprint!("{}", error.render());
    eprintln!("{}", error);
}
