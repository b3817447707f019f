//! Mnemonics for the Xilinx 7-series 6-bit instruction register codes.  Used
//! only when logging instruction legs; never consulted by the state machine.

/// Look up the mnemonic for a 6-bit instruction code.  Unknown codes return
/// an empty string.
pub fn decode_mnemonic(code: u8) -> &'static str {
    match code {
        0b100110 => "EXTEST",
        0b111100 => "EXTEST_PULSE",
        0b111101 => "EXTEST_TRAIN",
        0b000001 => "SAMPLE",
        0b000010 => "USER1",
        0b000011 => "USER2",
        0b100010 => "USER3",
        0b100011 => "USER4",
        0b000100 => "CFG_OUT",
        0b000101 => "CFG_IN",
        0b001001 => "IDCODE",
        0b001010 => "HIGHZ_IO",
        0b001011 => "JPROGRAM",
        0b001100 => "JSTART",
        0b001101 => "JSHUTDOWN",
        0b110111 => "XADC_DRP",
        0b010000 => "ISC_ENABLE",
        0b010001 => "ISC_PROGRAM",
        0b010010 => "XSC_PROGRAM_KEY",
        0b010111 => "XSC_DNA",
        0b110010 => "FUSE_DNA",
        0b010100 => "ISC_NOOP",
        0b010110 => "ISC_DISABLE",
        0b111111 => "BYPASS",
        0b110001 => "FUSE_KEY",
        0b110011 => "FUSE_USER",
        0b110100 => "FUSE_CNTL",
        _ => "",
    }
}
