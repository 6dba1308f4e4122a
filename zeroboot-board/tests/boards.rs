//! Shipped board definitions resolve to the expected configurations

use std::fs;
use std::path::PathBuf;

use proptest::prelude::*;
use zeroboot_board::emit::encode;
use zeroboot_board::{try_emit, Board, BoardError, BLOB_FILE_NAME};
use zeroboot_core::blob::decode;
use zeroboot_core::clock::{PllFraction, PllReference};
use zeroboot_core::{
    BootTrigger, ClockPlan, LinkConfig, PadRole, PinId, TARGET_MCK_HZ,
};

fn board_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../boards")
        .join(name)
}

fn load(name: &str) -> Board {
    Board::load(board_path(name)).unwrap()
}

#[test]
fn test_all_boards_resolve_cleanly() {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../boards");
    let mut count = 0;
    for entry in fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        if path.extension().is_some_and(|ext| ext == "toml") {
            let resolution = Board::load(&path).unwrap().resolve().unwrap();
            assert!(
                resolution.warnings.is_empty(),
                "{}: {:?}",
                path.display(),
                resolution.warnings
            );
            count += 1;
        }
    }
    assert!(count >= 5);
}

#[test]
fn test_generic_x21e() {
    let config = load("generic_x21e.toml").resolve().unwrap().config;
    assert_eq!(
        config.clock,
        ClockPlan::OpenLoopDfll {
            fine_calibration: 512,
            usb_clock_recovery: true
        }
    );
    assert_eq!(config.link, LinkConfig::Usb);
    assert_eq!(config.boot_trigger, BootTrigger::DoubleTap);

    let identity = &config.identity;
    assert_eq!(identity.vendor_id_bytes(), [0xD0, 0x16]);
    assert_eq!(identity.product_id_bytes(), [0x57, 0x05]);
    assert_eq!(identity.manufacturer.as_deref(), Some("MattairTech LLC"));
    assert_eq!(identity.product.as_deref(), Some("Generic SAMx21E"));
    assert_eq!(identity.advertised_commands(), b"XYZ");
}

#[test]
fn test_generic_x21e_boot_usart() {
    let config = load("generic_x21e_both.toml").resolve().unwrap().config;
    assert!(config.link.usb_enabled());
    assert_eq!(
        config.clock,
        ClockPlan::OpenLoopDfll {
            fine_calibration: 512,
            usb_clock_recovery: true
        }
    );

    let uart = config.link.uart().unwrap();
    assert_eq!(uart.pads.instance, 0);
    assert_eq!(
        uart.pads.roles,
        [PadRole::Unused, PadRole::Unused, PadRole::Tx, PadRole::Rx]
    );
    assert_eq!(uart.pads.function_codes[2], 0x000A_0002);
    assert_eq!(uart.pads.function_codes[3], 0x000B_0002);
    assert_eq!(uart.settings.rxpo, 3);
    assert_eq!(uart.settings.txpo, 1);
    assert_eq!(uart.baud_rate, 115_200);
}

#[test]
fn test_generic_c21_uart() {
    let config = load("generic_c21_uart.toml").resolve().unwrap().config;
    assert_eq!(config.clock, ClockPlan::InternalOsc48m);
    assert_eq!(config.boot_trigger, BootTrigger::PinLevel(PinId::pa(15)));

    let LinkConfig::Uart(uart) = config.link else {
        panic!("expected UART-only link, got {:?}", config.link);
    };
    assert_eq!(
        uart.pads.roles,
        [PadRole::Tx, PadRole::Rx, PadRole::Unused, PadRole::Unused]
    );
    assert_eq!(uart.pads.function_codes[0], 0x0004_0003);
    assert_eq!(uart.pads.function_codes[1], 0x0005_0003);
    assert_eq!(uart.settings.txpo, 0);
    assert_eq!(uart.settings.rxpo, 1);
    assert_eq!(uart.baud_register, 63_019);
}

#[test]
fn test_crystal_l21() {
    let config = load("crystal_l21.toml").resolve().unwrap().config;
    let ClockPlan::Pll(derivation) = config.clock else {
        panic!("expected a DPLL plan, got {:?}", config.clock);
    };
    assert_eq!(derivation.reference, PllReference::Xosc);
    assert_eq!(derivation.divider, 6);
    assert_eq!(derivation.multiplier, 24);
    assert_eq!(derivation.output_hz(), TARGET_MCK_HZ);
    assert_eq!(config.link.uart().unwrap().pads.instance, 3);
    assert!(config.link.usb_enabled());
}

#[test]
fn test_minimal_d11_fractional() {
    let config = load("minimal_d11.toml").resolve().unwrap().config;
    let ClockPlan::Pll(derivation) = config.clock else {
        panic!("expected a DPLL plan, got {:?}", config.clock);
    };
    assert_eq!(derivation.reference, PllReference::Xosc32k);
    assert!(derivation.fractional_enabled);
    assert_eq!(
        derivation.fraction,
        Some(PllFraction {
            integer: 1464,
            sixteenths: 14
        })
    );
    assert_eq!(derivation.output_hz(), 48_001_024);
}

#[test]
fn test_encoding_is_bit_identical() {
    for name in ["generic_x21e.toml", "crystal_l21.toml"] {
        let first = encode(&load(name).resolve().unwrap()).unwrap();
        let second = encode(&load(name).resolve().unwrap()).unwrap();
        assert_eq!(first, second, "{}", name);
    }
}

#[test]
fn test_emit_round_trip_through_out_dir() {
    let out_dir = tempfile::tempdir().unwrap();
    let emitted = try_emit(&board_path("crystal_l21.toml"), out_dir.path()).unwrap();
    let bytes = fs::read(out_dir.path().join(BLOB_FILE_NAME)).unwrap();
    assert_eq!(decode(&bytes).unwrap(), emitted.resolution.config);
}

#[test]
fn test_invalid_toml_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.toml");
    fs::write(&path, "[board\nname = ").unwrap();
    assert!(matches!(Board::load(&path), Err(BoardError::Toml(_))));
}

fn c21_board(baud: u32) -> String {
    format!(
        r#"
        [board]
        name = "Baud"
        chip = "samc21"

        [uart]
        sercom = 0
        baud = {}
        pad = [
            {{ index = 0, role = "tx", pin = "PA04", mux = "D" }},
            {{ index = 1, role = "rx", pin = "PA05", mux = "D" }},
        ]
        "#,
        baud
    )
}

proptest! {
    #[test]
    fn baud_within_oversampling_limit_resolves(baud in 1_200u32..=3_000_000) {
        let config = Board::parse(&c21_board(baud)).unwrap().resolve().unwrap().config;
        let uart = config.link.uart().unwrap();
        prop_assert_eq!(uart.baud_rate, baud);
    }

    #[test]
    fn baud_above_oversampling_limit_fails(baud in 3_000_001u32..=10_000_000) {
        let result = Board::parse(&c21_board(baud)).unwrap().resolve();
        prop_assert!(matches!(result, Err(BoardError::Resolve(_))));
    }
}
