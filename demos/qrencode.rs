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

use dotted_qr::{ErrorCorrectionLevel, QrCode};
use std::env;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let data = args.join(" ");
    println!("QR code for {}", data);

    let qr_code = QrCode::generator()
        .with_text(data.as_str())
        .with_error_correction_level(ErrorCorrectionLevel::Low)
        .build();

    match qr_code {
        Ok(qr_code) => {
            println!(
                "Version {}, mask {}",
                qr_code.version().number(),
                qr_code.mask_pattern()
            );
            println!("{}", qr_code);
        }
        Err(err) => {
            eprintln!("Unable to generate QR code [{}]: {}", err.code(), err);
            std::process::exit(1);
        }
    }
}
