use std::io::Write;
use std::process::ExitCode;

use anyhow::Context;
use lexopt::ValueExt;
use pyre::MatcherBuilder;

const USAGE: &str = "\
Search a file with the pyre regex engine.

USAGE:
    pyre [options] <regex> <path>

Prints one line per match in the form 'start..end<TAB>text' and exits 0
if at least one match was found, 1 if none, or 2 on a malformed pattern
or an I/O failure. In addition to the usual operators, patterns support
intersection (r & s), complement (~r), difference (r - s) and symmetric
difference (r ^ s). By default '.' matches any character.

OPTIONS:
    -d, --debug    Log DFA construction and dump the compiled automaton
    -f, --first    Stop after the leftmost match
    -h, --help     Print this help
";

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("pyre: {:#}", err);
            ExitCode::from(2)
        }
    }
}

fn run() -> anyhow::Result<ExitCode> {
    let mut debug = false;
    let mut first = false;
    let mut positional: Vec<String> = vec![];

    let mut p = lexopt::Parser::from_env();
    while let Some(arg) = p.next()? {
        use lexopt::Arg::*;
        match arg {
            Short('d') | Long("debug") => debug = true,
            Short('f') | Long("first") => first = true,
            Short('h') | Long("help") => {
                print!("{}", USAGE);
                return Ok(ExitCode::SUCCESS);
            }
            Value(v) => positional.push(v.string()?),
            arg => return Err(arg.unexpected().into()),
        }
    }

    let mut logger = env_logger::Builder::from_default_env();
    if debug {
        logger.filter_level(log::LevelFilter::Debug);
    }
    logger.format_timestamp(None).init();

    let (pattern, path) = match positional.as_slice() {
        [pattern, path] => (pattern.clone(), path.clone()),
        _ => anyhow::bail!("expected <regex> and <path>\n\n{}", USAGE),
    };

    let matcher = MatcherBuilder::new()
        .dot_matches_new_line(true)
        .build(&pattern)
        .with_context(|| format!("failed to compile pattern '{}'", pattern))?;
    if debug {
        log::debug!("{:?}", matcher.dfa());
    }

    let haystack = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path))?;

    let mut found = false;
    let stdout = std::io::stdout();
    let mut stdout = stdout.lock();
    for caps in matcher.find_iter(&haystack) {
        found = true;
        let span = caps.span();
        writeln!(stdout, "{}\t{}", span, &haystack[span.range()])?;
        if first {
            break;
        }
    }
    Ok(if found { ExitCode::SUCCESS } else { ExitCode::from(1) })
}
