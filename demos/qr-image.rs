/* Copyright (C) 2021 Casper Meijn <casper@meijn.net>
 * SPDX-License-Identifier: GPL-3.0-or-later
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program.  If not, see <http://www.gnu.org/licenses/>.
 */

use dotted_qr::GeneratorConfig;
use std::env;
use std::fs;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args: Vec<String> = env::args().skip(1).collect();

    // Optional JSON configuration: qr-image --config config.json <text>
    let config = if args.first().map(String::as_str) == Some("--config") && args.len() >= 2 {
        let path = args.remove(1);
        args.remove(0);
        let json = fs::read_to_string(&path).unwrap_or_else(|err| {
            eprintln!("Unable to read {}: {}", path, err);
            std::process::exit(1);
        });
        GeneratorConfig::from_json(&json)
    } else {
        Ok(GeneratorConfig::default())
    };
    let data = args.join(" ");

    let png = config.and_then(|config| config.generate_png(&data));
    let png = match png {
        Ok(png) => png,
        Err(err) => {
            eprintln!("Unable to generate QR code [{}]: {}", err.code(), err);
            std::process::exit(1);
        }
    };

    let filename = "img.png";
    let result = fs::write(filename, png);
    if let Err(err) = result {
        eprintln!("Unable to write to file: {}", err);
        std::process::exit(1);
    }
    println!("Generated QR code for {} to {}", data, filename);
}
