//! Common Types for the LTE Downlink
//!
//! Defines the cell-level configuration types shared across the physical
//! layer, following 3GPP TS 36.211.

use num_derive::{FromPrimitive, ToPrimitive};
use serde::{Deserialize, Serialize};

/// Maximum number of physical resource blocks (20 MHz carrier)
pub const MAX_PRB: u32 = 110;
/// Minimum number of physical resource blocks (1.4 MHz carrier)
pub const MIN_PRB: u32 = 6;
/// Subcarriers per resource block at 15 kHz spacing
pub const NRE: u32 = 12;
/// Subframes per radio frame
pub const NOF_SF_X_FRAME: u32 = 10;
/// Slots per radio frame
pub const NSLOTS_X_FRAME: u32 = 20;
/// Maximum number of cell-specific antenna ports
pub const MAX_PORTS: u32 = 4;
/// Maximum physical cell identity
pub const MAX_CELL_ID: u16 = 503;

/// Cyclic prefix type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CyclicPrefix {
    /// Normal CP: 7 OFDM symbols per slot
    Normal,
    /// Extended CP: 6 OFDM symbols per slot
    Extended,
}

impl CyclicPrefix {
    /// Number of OFDM symbols per slot
    pub fn nof_symbols(&self) -> u32 {
        match self {
            CyclicPrefix::Normal => 7,
            CyclicPrefix::Extended => 6,
        }
    }

    /// True for the normal cyclic prefix
    pub fn is_normal(&self) -> bool {
        matches!(self, CyclicPrefix::Normal)
    }
}

/// Frame structure type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FrameType {
    /// Frame structure type 1 (FDD)
    Fdd,
    /// Frame structure type 2 (TDD)
    Tdd,
}

/// TDD subframe classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TddSfType {
    Downlink,
    Uplink,
    Special,
}

// TS 36.211 Table 4.2-2: uplink-downlink configurations 0-6
const TDD_SF_TYPE: [[TddSfType; 10]; 7] = {
    use TddSfType::{Downlink as D, Special as S, Uplink as U};
    [
        [D, S, U, U, U, D, S, U, U, U],
        [D, S, U, U, D, D, S, U, U, D],
        [D, S, U, D, D, D, S, U, D, D],
        [D, S, U, U, U, D, D, D, D, D],
        [D, S, U, U, D, D, D, D, D, D],
        [D, S, U, D, D, D, D, D, D, D],
        [D, S, U, U, U, D, S, U, U, D],
    ]
};

// TS 36.211 Table 4.2-1: DwPTS length in OFDM symbols per special
// subframe configuration
const TDD_NOF_DW_SYMBOLS_NORM: [u32; 10] = [3, 9, 10, 11, 12, 3, 9, 10, 11, 6];
const TDD_NOF_DW_SYMBOLS_EXT: [u32; 8] = [3, 8, 9, 10, 3, 8, 9, 5];

/// TDD frame configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TddConfig {
    /// Uplink-downlink configuration (0-6)
    pub sf_config: u32,
    /// Special subframe configuration (0-9 normal CP, 0-7 extended CP)
    pub ss_config: u32,
    /// Whether a TDD configuration has been signalled
    pub configured: bool,
}

impl TddConfig {
    /// Classify subframe `sf_idx` (0-9) under this configuration
    pub fn sf_type(&self, sf_idx: u32) -> TddSfType {
        debug_assert!(self.sf_config < 7);
        debug_assert!(sf_idx < NOF_SF_X_FRAME);
        TDD_SF_TYPE[self.sf_config as usize][sf_idx as usize]
    }

    /// Downlink OFDM symbols (DwPTS) in a special subframe
    pub fn nof_dw_symbols(&self, cp: CyclicPrefix) -> u32 {
        match cp {
            CyclicPrefix::Normal => {
                debug_assert!((self.ss_config as usize) < TDD_NOF_DW_SYMBOLS_NORM.len());
                TDD_NOF_DW_SYMBOLS_NORM[self.ss_config as usize]
            }
            CyclicPrefix::Extended => {
                debug_assert!((self.ss_config as usize) < TDD_NOF_DW_SYMBOLS_EXT.len());
                TDD_NOF_DW_SYMBOLS_EXT[self.ss_config as usize]
            }
        }
    }

    /// Check configuration indices against the table bounds for `cp`
    pub fn is_valid(&self, cp: CyclicPrefix) -> bool {
        let max_ss = if cp.is_normal() {
            TDD_NOF_DW_SYMBOLS_NORM.len()
        } else {
            TDD_NOF_DW_SYMBOLS_EXT.len()
        };
        self.sf_config < 7 && (self.ss_config as usize) < max_ss
    }
}

/// MBSFN subcarrier spacing
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive, ToPrimitive, Serialize, Deserialize)]
pub enum MbsfnScs {
    /// 15 kHz
    Scs15 = 0,
    /// 7.5 kHz
    Scs7k5 = 1,
    /// 2.5 kHz
    Scs2k5 = 2,
    /// 1.25 kHz
    Scs1k25 = 3,
    /// 0.375 kHz
    Scs0k375 = 4,
}

impl MbsfnScs {
    /// Subcarriers per resource block at this spacing
    pub fn nre(&self) -> u32 {
        match self {
            MbsfnScs::Scs15 => 12,
            MbsfnScs::Scs7k5 => 24,
            MbsfnScs::Scs2k5 => 72,
            MbsfnScs::Scs1k25 => 144,
            MbsfnScs::Scs0k375 => 480,
        }
    }

    /// Table index of this variant
    pub fn index(&self) -> usize {
        *self as usize
    }
}

/// Downlink cell configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    /// Physical cell identity (0-503)
    pub id: u16,
    /// Configured downlink resource blocks
    pub nof_prb: u32,
    /// Cell-specific antenna ports (1, 2 or 4)
    pub nof_ports: u32,
    /// Cyclic prefix type
    pub cp: CyclicPrefix,
    /// Frame structure type
    pub frame_type: FrameType,
}

impl Cell {
    /// Validate identity, bandwidth and port count ranges
    pub fn is_valid(&self) -> bool {
        self.id <= MAX_CELL_ID
            && (MIN_PRB..=MAX_PRB).contains(&self.nof_prb)
            && (1..=MAX_PORTS).contains(&self.nof_ports)
    }
}

/// Downlink subframe context for per-TTI processing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DlSfConfig {
    /// Transmission time interval counter; `tti % 10` is the subframe index
    pub tti: u32,
    /// TDD configuration, ignored for FDD cells
    pub tdd_config: TddConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_validity() {
        let mut cell = Cell {
            id: 503,
            nof_prb: 110,
            nof_ports: 4,
            cp: CyclicPrefix::Normal,
            frame_type: FrameType::Fdd,
        };
        assert!(cell.is_valid());

        cell.id = 504;
        assert!(!cell.is_valid());

        cell.id = 0;
        cell.nof_prb = 5;
        assert!(!cell.is_valid());

        cell.nof_prb = 6;
        cell.nof_ports = 5;
        assert!(!cell.is_valid());
    }

    #[test]
    fn test_tdd_sf_classification() {
        // All configurations start D, S, U
        for cfg in 0..7 {
            let tdd = TddConfig {
                sf_config: cfg,
                ss_config: 0,
                configured: true,
            };
            assert_eq!(tdd.sf_type(0), TddSfType::Downlink);
            assert_eq!(tdd.sf_type(1), TddSfType::Special);
            assert_eq!(tdd.sf_type(2), TddSfType::Uplink);
        }

        // Configuration 0 has a second special subframe at index 6,
        // configuration 5 does not
        let tdd0 = TddConfig {
            sf_config: 0,
            ss_config: 0,
            configured: true,
        };
        let tdd5 = TddConfig {
            sf_config: 5,
            ss_config: 0,
            configured: true,
        };
        assert_eq!(tdd0.sf_type(6), TddSfType::Special);
        assert_eq!(tdd5.sf_type(6), TddSfType::Downlink);
    }

    #[test]
    fn test_tdd_dw_symbols() {
        let tdd = TddConfig {
            sf_config: 0,
            ss_config: 4,
            configured: true,
        };
        assert_eq!(tdd.nof_dw_symbols(CyclicPrefix::Normal), 12);
        assert_eq!(tdd.nof_dw_symbols(CyclicPrefix::Extended), 3);

        let tdd = TddConfig { ss_config: 9, ..tdd };
        assert_eq!(tdd.nof_dw_symbols(CyclicPrefix::Normal), 6);
        assert!(!tdd.is_valid(CyclicPrefix::Extended));
        assert!(tdd.is_valid(CyclicPrefix::Normal));
    }

    #[test]
    fn test_scs_nre() {
        assert_eq!(MbsfnScs::Scs15.nre(), 12);
        assert_eq!(MbsfnScs::Scs7k5.nre(), 24);
        assert_eq!(MbsfnScs::Scs2k5.nre(), 72);
        assert_eq!(MbsfnScs::Scs1k25.nre(), 144);
        assert_eq!(MbsfnScs::Scs0k375.nre(), 480);
    }

    #[test]
    fn test_cp_symbols() {
        assert_eq!(CyclicPrefix::Normal.nof_symbols(), 7);
        assert_eq!(CyclicPrefix::Extended.nof_symbols(), 6);
        assert!(CyclicPrefix::Normal.is_normal());
        assert!(!CyclicPrefix::Extended.is_normal());
    }
}
