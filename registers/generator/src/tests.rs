// Licensed under the Apache-2.0 license

//! End-to-end tests: SVD text in, generated bindings out.

mod test {
    use crate::config::{FilterConfig, GeneratorConfig, OutputFormat};
    use crate::layout::compute_overlay;
    use crate::output::{emit, render};
    use log::LevelFilter;
    use mcu_registers_svd::{parse_str, validate, Device, Error};
    use simple_logger::SimpleLogger;

    const NRF51: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<device schemaVersion="1.1">
  <name>nrf51</name>
  <series>nrf51</series>
  <description>nRF51 reference
    description</description>
  <licenseText>
    Copyright (c) 2010 - 2018, Nordic Semiconductor ASA\n
    All rights reserved.
  </licenseText>
  <cpu><name>CM0</name></cpu>
  <peripherals>
    <peripheral>
      <name>POWER</name>
      <description>Power control</description>
      <baseAddress>0x40000000</baseAddress>
      <interrupt><name>POWER_CLOCK</name><value>0</value></interrupt>
      <registers>
        <register>
          <name>TASKS_CONSTLAT</name>
          <description>Enable constant latency mode.</description>
          <addressOffset>0x078</addressOffset>
        </register>
        <register>
          <name>RESETREAS</name>
          <description>Reset reason.</description>
          <addressOffset>0x400</addressOffset>
          <fields>
            <field>
              <name>LOCKUP</name>
              <lsb>3</lsb>
              <msb>3</msb>
              <enumeratedValues>
                <enumeratedValue><name>NotDetected</name><description>Reset not detected.</description><value>0</value></enumeratedValue>
                <enumeratedValue><name>Detected</name><description>Reset detected.</description><value>1</value></enumeratedValue>
              </enumeratedValues>
            </field>
          </fields>
        </register>
      </registers>
    </peripheral>
    <peripheral>
      <name>CLOCK</name>
      <description>Clock control</description>
      <baseAddress>0x40000000</baseAddress>
      <interrupt><name>POWER_CLOCK</name><value>0</value></interrupt>
      <registers>
        <register>
          <name>TASKS_HFCLKSTART</name>
          <addressOffset>0x000</addressOffset>
        </register>
      </registers>
    </peripheral>
    <peripheral>
      <name>UART0</name>
      <description>Universal Asynchronous Receiver/Transmitter</description>
      <baseAddress>0x40002000</baseAddress>
      <interrupt><name>UART0</name><value>2</value></interrupt>
      <registers>
        <register>
          <name>STATUS</name>
          <description>Status register</description>
          <addressOffset>0x00</addressOffset>
          <fields>
            <field><name>READY</name><lsb>0</lsb><msb>0</msb></field>
          </fields>
        </register>
        <register>
          <dim>4</dim>
          <dimIncrement>0x4</dimIncrement>
          <name>RXBUF[%s]</name>
          <addressOffset>0x08</addressOffset>
        </register>
        <register>
          <name>RXD_ALIAS</name>
          <addressOffset>0x0C</addressOffset>
        </register>
        <cluster>
          <name>PSEL</name>
          <addressOffset>0x20</addressOffset>
          <register><name>RTS</name><addressOffset>0x0</addressOffset></register>
          <register><name>TXD</name><addressOffset>0x4</addressOffset></register>
        </cluster>
        <cluster>
          <dim>2</dim>
          <dimIncrement>0x8</dimIncrement>
          <name>EVTCH[%s]</name>
          <addressOffset>0x100</addressOffset>
          <register><name>EN</name><addressOffset>0x0</addressOffset></register>
        </cluster>
      </registers>
    </peripheral>
  </peripherals>
</device>
"#;

    fn init_logger() {
        let _ = SimpleLogger::new().with_level(LevelFilter::Debug).init();
    }

    fn nrf51() -> Device {
        init_logger();
        let device = parse_str(NRF51, "nrf51.svd").unwrap();
        validate(&device).unwrap();
        device
    }

    fn generate(config: &GeneratorConfig) -> String {
        let code = render(&nrf51(), config).unwrap();
        println!("{code}");
        code
    }

    #[test]
    fn test_go_header() {
        let code = generate(&GeneratorConfig::default());
        assert!(code.starts_with(
            "// Automatically generated file. DO NOT EDIT.\n\
             // Generated by svd-gen from nrf51.svd, see https://github.com/NordicSemiconductor/nrfx/tree/master/mdk\n\
             \n\
             // +build device,nrf51\n\
             \n\
             // nRF51 reference description\n\
             //\n\
             //     Copyright (c) 2010 - 2018, Nordic Semiconductor ASA\n\
             //     All rights reserved.\n\
             package device\n"
        ));
        assert!(code.contains("type RegValue = __volatile\n"));
        assert!(code.contains(
            "// Some information about this device.\nconst (\n\tDEVICE = \"nrf51\"\n\tARCH = \"armv6m\"\n\tFAMILY = \"nrf51\"\n)\n"
        ));
    }

    #[test]
    fn test_go_interrupts_merged() {
        let code = generate(&GeneratorConfig::default());
        assert!(code.contains(
            "// Interrupts\nconst (\n\
             \tIRQ_POWER_CLOCK = 0 // Power control // Clock control\n\
             \tIRQ_UART0 = 2 // Universal Asynchronous Receiver/Transmitter\n\
             \tIRQ_max = 2 // Highest interrupt number on this device.\n)\n"
        ));
        assert_eq!(code.matches("IRQ_POWER_CLOCK").count(), 1);
    }

    #[test]
    fn test_go_overlays() {
        let code = generate(&GeneratorConfig::default());
        assert!(code.contains(
            "// Power control\ntype POWER_Type struct {\n\
             \t_padding0 [30]__volatile\n\
             \tTASKS_CONSTLAT __volatile\n\
             \t_padding1 [225]__volatile\n\
             \tRESETREAS __volatile\n}\n"
        ));
        // RXD_ALIAS lies inside RXBUF and is dropped from the layout.
        assert!(code.contains(
            "type UART0_Type struct {\n\
             \tSTATUS __volatile\n\
             \t_padding0 __volatile\n\
             \tRXBUF [4]__volatile\n\
             \t_padding1 [2]__volatile\n\
             \tPSEL_RTS __volatile\n\
             \tPSEL_TXD __volatile\n}\n"
        ));
        assert!(!code.contains("\tRXD_ALIAS __volatile"));
        assert!(!code.contains("EVTCH"));
    }

    #[test]
    fn test_go_instances() {
        let code = generate(&GeneratorConfig::default());
        assert!(code.contains("// Peripherals.\nvar (\n\tPOWER = (*POWER_Type)(unsafe.Pointer(uintptr(0x40000000))) // Power control\n"));
        assert!(code.contains(
            "\tUART0 = (*UART0_Type)(unsafe.Pointer(uintptr(0x40002000))) // Universal Asynchronous Receiver/Transmitter\n"
        ));
    }

    #[test]
    fn test_go_bitfields() {
        let code = generate(&GeneratorConfig::default());
        assert!(code.contains(
            "// Bitfields for POWER: Power control\nconst (\n\
             \t// RESETREAS: Reset reason.\n\
             \tPOWER_RESETREAS_LOCKUP_Pos = 0x3 // Position of LOCKUP field.\n\
             \tPOWER_RESETREAS_LOCKUP_Msk = 0x8 // Bit mask of LOCKUP field.\n\
             \tPOWER_RESETREAS_LOCKUP_NotDetected = 0x0 // Reset not detected.\n\
             \tPOWER_RESETREAS_LOCKUP_Detected = 0x1 // Reset detected.\n)\n"
        ));
        assert!(code.contains("\tUART0_STATUS_READY_Msk = 0x1 // Bit mask of READY field.\n"));
        assert!(!code.contains("Bitfields for CLOCK"));
    }

    #[test]
    fn test_go_section_order() {
        let code = generate(&GeneratorConfig::default());
        let positions: Vec<_> = [
            "package device",
            "DEVICE = ",
            "IRQ_max",
            "type POWER_Type struct",
            "var (",
            "Bitfields for POWER",
            "Bitfields for UART0",
        ]
        .iter()
        .map(|needle| code.find(needle).unwrap())
        .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{positions:?}");
    }

    #[test]
    fn test_rust_output() {
        let config = GeneratorConfig::new().with_format(OutputFormat::TockRegisters);
        let code = generate(&config);
        assert!(code.starts_with("// Licensed under the Apache-2.0 license\n"));
        assert!(code.contains(
            "#![allow(non_camel_case_types, non_snake_case, non_upper_case_globals)]"
        ));
        assert!(code.contains("pub mod device {\n    //! Some information about this device.\n"));
        assert!(code.contains("    pub const ARCH: &str = \"armv6m\";\n"));
        assert!(code.contains(
            "    /// Power control // Clock control\n    pub const IRQ_POWER_CLOCK: u32 = 0;\n"
        ));
        assert!(code.contains("    pub const IRQ_max: u32 = 2;\n"));

        assert!(code.contains("    use tock_registers::register_structs;\n"));
        assert!(code.contains("            (0x78 => pub TASKS_CONSTLAT: ReadWrite<u32>),\n"));
        assert!(code.contains("            (0x7c => _padding1),\n"));
        assert!(code.contains("            (0x404 => @END),\n"));
        assert!(code.contains("            (0x8 => pub RXBUF: [ReadWrite<u32>; 4]),\n"));
        assert!(code.contains("            (0x18 => _padding1),\n"));
        assert!(code.contains("            (0x20 => pub PSEL_RTS: ReadWrite<u32>),\n"));
        assert!(code.contains("            (0x28 => @END),\n"));

        assert!(code.contains(
            "pub const UART0: *const regs::UART0_Type = 0x4000_2000 as *const regs::UART0_Type;\n"
        ));
        assert!(code.contains("pub mod power_bits {\n    //! Bitfields for POWER: Power control\n"));
        assert!(code.contains("    pub const POWER_RESETREAS_LOCKUP_Msk: u32 = 8;\n"));
        assert!(!code.contains("pub mod clock_bits"));
    }

    #[test]
    fn test_rust_modules_do_not_clash_with_peripheral_names() {
        let xml = NRF51
            .replace("<name>POWER</name>", "<name>DEVICE</name>")
            .replace("<name>UART0</name>\n      <description>", "<name>REGS</name>\n      <description>");
        let device = parse_str(&xml, "nrf51.svd").unwrap();
        validate(&device).unwrap();
        let config = GeneratorConfig::new().with_format(OutputFormat::TockRegisters);
        let code = render(&device, &config).unwrap();
        for module in ["device", "interrupts", "regs", "device_bits", "regs_bits"] {
            assert_eq!(
                code.matches(&format!("\npub mod {module} {{\n")).count(),
                1,
                "module {module}"
            );
        }
        assert!(code.contains("    pub const DEVICE_RESETREAS_LOCKUP_Pos: u32 = 3;\n"));
    }

    #[test]
    fn test_layout_matches_documented_addresses() {
        let device = nrf51();
        for peripheral in &device.peripherals {
            let overlay = compute_overlay(peripheral);
            let mut offset = 0;
            for item in &overlay.items {
                assert_eq!(item.offset(), offset);
                offset += item.size();
            }
            assert_eq!(offset, overlay.size);
            let end = peripheral
                .registers
                .iter()
                .map(|r| r.address + r.size())
                .max()
                .unwrap();
            assert_eq!(overlay.base_address + overlay.size, end);
        }
    }

    #[test]
    fn test_filter_excludes_peripheral() {
        let config = GeneratorConfig::new().with_filter(FilterConfig::new().exclude_peripheral("uart0"));
        let code = generate(&config);
        assert!(!code.contains("UART0_Type"));
        assert!(!code.contains("Bitfields for UART0"));
        assert!(code.contains("POWER_Type"));
        // Interrupt numbers describe the device and are kept.
        assert!(code.contains("IRQ_UART0 = 2"));
    }

    #[test]
    fn test_package_and_source_override() {
        let config = GeneratorConfig::new()
            .with_package("nrf")
            .with_descriptor_source("https://example.com/mdk");
        let code = generate(&config);
        assert!(code.contains("see https://example.com/mdk\n"));
        assert!(code.contains("// +build nrf,nrf51\n"));
        assert!(code.contains("\npackage nrf\n"));
    }

    #[test]
    fn test_no_interrupts_no_max() {
        let xml = NRF51
            .replace("<interrupt><name>POWER_CLOCK</name><value>0</value></interrupt>", "")
            .replace("<interrupt><name>UART0</name><value>2</value></interrupt>", "");
        let device = parse_str(&xml, "nrf51.svd").unwrap();
        let code = render(&device, &GeneratorConfig::default()).unwrap();
        assert!(!code.contains("IRQ_max"));
        assert!(!code.contains("// Interrupts"));
    }

    #[test]
    fn test_unsupported_cpu_produces_nothing() {
        let xml = NRF51.replace("<name>CM0</name>", "<name>CM99</name>");
        let err = parse_str(&xml, "nrf51.svd").unwrap_err();
        assert!(matches!(err, Error::UnsupportedCpu(ref cpu) if cpu == "CM99"));
    }

    #[test]
    fn test_interrupt_conflict() {
        let xml = NRF51.replacen(
            "<interrupt><name>POWER_CLOCK</name><value>0</value></interrupt>\n      <registers>\n        <register>\n          <name>TASKS_HFCLKSTART",
            "<interrupt><name>POWER_CLOCK</name><value>5</value></interrupt>\n      <registers>\n        <register>\n          <name>TASKS_HFCLKSTART",
            1,
        );
        let err = parse_str(&xml, "nrf51.svd").unwrap_err();
        match err {
            Error::InterruptIndexConflict {
                name,
                expected,
                found,
            } => {
                assert_eq!(name, "POWER_CLOCK");
                assert_eq!(expected, 0);
                assert_eq!(found, 5);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_emit_writes_rendered_code() {
        let device = nrf51();
        let config = GeneratorConfig::default();
        let mut buf = Vec::new();
        emit(&device, &config, &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), render(&device, &config).unwrap());
    }
}
