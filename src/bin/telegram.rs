use std::env;

use ibis_serial::telegram::{Telegram, MAX_TELEGRAM_LENGTH};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args: Vec<String> = env::args().collect();

    if args.len() != 2 {
        return Err("Provide 1 argument, e.g. ds003a@Hauptbahnhof or gsp@1|Linie 5|Zoo".into());
    }

    let str_telegram = args.pop().ok_or("No telegram argument")?;

    let telegram = str_telegram
        .parse::<Telegram>()
        .map_err(|e| format!("could not parse telegram {}: {:?}", str_telegram, e))?;
    let sealed = telegram.encode()?;

    let mut hex = [0u8; 2 * MAX_TELEGRAM_LENGTH];
    let hex_len = 2 * sealed.len();
    base16::encode_config_slice(sealed.as_bytes(), base16::EncodeLower, &mut hex[..hex_len]);

    println!(
        "telegram {:?},\nsealed: {:?},\nbytes: {:02x?},\nhex: {}",
        &telegram,
        &sealed,
        sealed.as_bytes(),
        std::str::from_utf8(&hex[..hex_len])?
    );
    Ok(())
}
