use std::{env, thread, time::Duration};

use ibis_serial::{telegram::Telegram, transport};

const DEFAULT_PORT_NAME: &str = "/dev/ttyUSB0";

fn main() {
    let port_name = env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_PORT_NAME.to_string());

    let telegrams = [
        Telegram::run_number("42"),
        Telegram::free_text("Hauptbahnhof"),
        Telegram::compact_text("Zoo"),
        Telegram::two_line_display(1, "Nächster Halt", "Münchner Freiheit"),
    ];

    match transport::open(&port_name) {
        Ok(mut sender) => {
            for telegram in telegrams.iter() {
                match telegram {
                    Ok(telegram) => {
                        if let Err(e) = sender.send(telegram) {
                            eprintln!("Failed to send {:?}. Error: {}", telegram, e);
                        }
                    }
                    Err(e) => eprintln!("Skipping telegram. Error: {}", e),
                }
                // 1200 baud is slow, give the display time to render
                thread::sleep(Duration::from_millis(2500));
            }
        }
        Err(e) => {
            eprintln!("Failed to open \"{}\". Error: {}", port_name, e);
            ::std::process::exit(1);
        }
    }
}
