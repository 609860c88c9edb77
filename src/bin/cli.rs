use chrono::NaiveDate;
use shift_roster::{
    Caregiver, DateRange, JsonRecordStore, Shift, ShiftTypeSpec, StoreConfig, bootstrap, logging,
    persistence::parse_date, shift_types::SHIFT_TYPES, weekly_hours,
};
use std::io::{self, Write};
use std::process::ExitCode;

fn render_text_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (ci, cell) in row.iter().enumerate() {
            if cell.len() > widths[ci] {
                widths[ci] = cell.len();
            }
        }
    }

    let mut sep = String::from("+");
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');
    out.push_str(&render_row(&widths, headers.iter().copied()));
    out.push('\n');
    out.push_str(&sep);
    out.push('\n');
    for row in rows {
        out.push_str(&render_row(&widths, row.iter().map(String::as_str)));
        out.push('\n');
    }
    out.push_str(&sep);
    out
}

fn render_row<'a>(widths: &[usize], cells: impl Iterator<Item = &'a str>) -> String {
    let mut line = String::from("|");
    for (ci, cell) in cells.enumerate() {
        line.push(' ');
        line.push_str(cell);
        line.push_str(&" ".repeat(widths[ci].saturating_sub(cell.len())));
        line.push_str(" |");
    }
    line
}

fn render_shifts(shifts: &[Shift], store: &JsonRecordStore) -> String {
    let rows: Vec<Vec<String>> = shifts
        .iter()
        .map(|shift| {
            let caregiver = match shift.caregiver(store) {
                Ok(Some(c)) => c.name.clone(),
                _ => format!("#{}", shift.caregiver_id),
            };
            vec![
                shift.id.to_string(),
                shift.date.to_string(),
                shift.shift_type.clone(),
                shift.time_range().unwrap_or("?").to_string(),
                caregiver,
            ]
        })
        .collect();
    render_text_table(&["id", "date", "type", "time", "caregiver"], &rows)
}

fn render_caregivers(caregivers: &[Caregiver]) -> String {
    let rows: Vec<Vec<String>> = caregivers
        .iter()
        .map(|c| vec![c.id.to_string(), c.name.clone()])
        .collect();
    render_text_table(&["id", "name"], &rows)
}

fn print_help() {
    println!(
        "Commands:\n  help                                  Show this help\n  caregivers                            List caregivers\n  shifts [start end]                    List shifts, optionally in [start, end)\n  caregiver <id> [start end]            Shifts for one caregiver\n  date <YYYY-MM-DD>                     Shifts on a date\n  type <code> <YYYY-MM-DD>              Shifts of a type on a date\n  add <YYYY-MM-DD> <code> <caregiver>   Add a shift\n  remove <id>                           Remove a shift\n  hours <caregiver> <week_start>        Weekly hours for a caregiver\n  types                                 Show shift types\n  import <sqlite_path>                  Replace data with a database export\n  quit                                  Exit"
    );
}

fn print_types() {
    let rows: Vec<Vec<String>> = SHIFT_TYPES
        .iter()
        .map(|s| {
            vec![
                s.code.to_string(),
                s.name.to_string(),
                s.time.to_string(),
                s.duration.to_string(),
            ]
        })
        .collect();
    println!("{}", render_text_table(&["code", "name", "time", "hours"], &rows));
}

fn parse_day(input: Option<&str>) -> Option<NaiveDate> {
    input.and_then(|s| parse_date(s).ok())
}

fn parse_range(start: Option<&str>, end: Option<&str>) -> Result<Option<DateRange>, String> {
    match (start, end) {
        (None, None) => Ok(None),
        (Some(s), Some(e)) => {
            let (Some(start), Some(end)) = (parse_day(Some(s)), parse_day(Some(e))) else {
                return Err("Invalid date (YYYY-MM-DD)".into());
            };
            DateRange::new(start, end).map(Some).map_err(|e| e.to_string())
        }
        _ => Err("Both start and end dates are required".into()),
    }
}

#[cfg(feature = "sqlite")]
fn run_import(store: &JsonRecordStore, path: &str) {
    match shift_roster::import_from_sqlite(path, store) {
        Ok(summary) => println!(
            "Imported {} caregivers and {} shifts from {}.",
            summary.caregivers, summary.shifts, path
        ),
        Err(e) => println!("Error: {}", e),
    }
}

#[cfg(not(feature = "sqlite"))]
fn run_import(_store: &JsonRecordStore, _path: &str) {
    println!("Rebuild with the `sqlite` feature to enable imports.");
}

fn main() -> ExitCode {
    logging::init();
    let store = match StoreConfig::from_env()
        .map_err(|e| e.to_string())
        .and_then(|config| bootstrap(&config).map_err(|e| e.to_string()))
    {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Failed to initialize data storage: {}", e);
            return ExitCode::FAILURE;
        }
    };

    println!("Shift Roster (CLI) - type 'help' for commands\n");

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        line.clear();
        match stdin.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let mut parts = input.split_whitespace();
        let cmd = parts.next().unwrap_or_default();
        match cmd {
            "help" => print_help(),
            "quit" | "exit" => break,
            "types" => print_types(),
            "caregivers" => match Caregiver::all(&store) {
                Ok(caregivers) => println!("{}", render_caregivers(&caregivers)),
                Err(e) => println!("Error: {}", e),
            },
            "shifts" => {
                let range = match parse_range(parts.next(), parts.next()) {
                    Ok(r) => r,
                    Err(msg) => {
                        println!("{}", msg);
                        continue;
                    }
                };
                match Shift::all(&store, range) {
                    Ok(shifts) => println!("{}", render_shifts(&shifts, &store)),
                    Err(e) => println!("Error: {}", e),
                }
            }
            "caregiver" => {
                let Some(id) = parts.next().and_then(|s| s.parse::<i32>().ok()) else {
                    println!("Usage: caregiver <id> [start end]");
                    continue;
                };
                let range = match parse_range(parts.next(), parts.next()) {
                    Ok(r) => r,
                    Err(msg) => {
                        println!("{}", msg);
                        continue;
                    }
                };
                match Shift::by_caregiver(&store, id, range) {
                    Ok(shifts) => println!("{}", render_shifts(&shifts, &store)),
                    Err(e) => println!("Error: {}", e),
                }
            }
            "date" => {
                let Some(date) = parse_day(parts.next()) else {
                    println!("Usage: date <YYYY-MM-DD>");
                    continue;
                };
                match Shift::by_date(&store, date) {
                    Ok(shifts) => println!("{}", render_shifts(&shifts, &store)),
                    Err(e) => println!("Error: {}", e),
                }
            }
            "type" => {
                let code = parts.next();
                let date = parse_day(parts.next());
                let (Some(code), Some(date)) = (code, date) else {
                    println!("Usage: type <code> <YYYY-MM-DD>");
                    continue;
                };
                match Shift::by_type(&store, code, date) {
                    Ok(shifts) => println!("{}", render_shifts(&shifts, &store)),
                    Err(e) => println!("Error: {}", e),
                }
            }
            "add" => {
                let date = parse_day(parts.next());
                let code = parts.next();
                let caregiver_id = parts.next().and_then(|s| s.parse::<i32>().ok());
                let (Some(date), Some(code), Some(caregiver_id)) = (date, code, caregiver_id)
                else {
                    println!("Usage: add <YYYY-MM-DD> <code> <caregiver_id>");
                    continue;
                };
                if ShiftTypeSpec::lookup(code).is_none() {
                    let known: Vec<&str> = ShiftTypeSpec::codes().collect();
                    println!("Unknown shift type '{}'. Known: {}", code, known.join(", "));
                    continue;
                }
                match Shift::add(&store, date, code, caregiver_id) {
                    Ok(shift) => println!(
                        "Added shift {}: {} {} caregiver {}.",
                        shift.id, shift.date, shift.shift_type, shift.caregiver_id
                    ),
                    Err(e) => println!("Error: {}", e),
                }
            }
            "remove" => {
                let Some(id) = parts.next().and_then(|s| s.parse::<i32>().ok()) else {
                    println!("Usage: remove <id>");
                    continue;
                };
                match Shift::remove(&store, id) {
                    Ok(true) => println!("Removed shift {}.", id),
                    Ok(false) => println!("No shift with id {}.", id),
                    Err(e) => println!("Error: {}", e),
                }
            }
            "hours" => {
                let id = parts.next().and_then(|s| s.parse::<i32>().ok());
                let week_start = parse_day(parts.next());
                let (Some(id), Some(week_start)) = (id, week_start) else {
                    println!("Usage: hours <caregiver_id> <YYYY-MM-DD>");
                    continue;
                };
                match weekly_hours(&store, id, week_start) {
                    Ok(summary) => println!(
                        "Caregiver {} week of {}: {} shifts, {}h of {}h ({}h remaining).",
                        summary.caregiver_id,
                        summary.week_start,
                        summary.shifts,
                        summary.hours,
                        summary.target_hours,
                        summary.remaining_hours
                    ),
                    Err(e) => println!("Error: {}", e),
                }
            }
            "import" => match parts.next() {
                Some(path) => run_import(&store, path),
                None => println!("Usage: import <sqlite_path>"),
            },
            _ => {
                println!("Unknown command. Type 'help'.");
            }
        }
    }
    ExitCode::SUCCESS
}
