//! Resource-Grid Index Arithmetic
//!
//! A subframe resource grid is a flat, caller-owned array of complex
//! samples ordered symbol-major. These functions translate
//! (OFDM symbol, subcarrier) coordinates and reference-signal pilot
//! positions into flat indices; the grid memory itself lives elsewhere.

use crate::refsignal_dl::mbsfn_rs_per_symbol;
use common::types::{CyclicPrefix, MbsfnScs, NRE};

// OFDM symbols spanning one 1 ms MBSFN subframe at each numerology
const MBSFN_SF_NSYMB: [u32; 5] = [12, 6, 2, 1, 1];

/// Flat index of a resource element in a subframe grid
pub fn re_idx(nof_prb: u32, symbol_idx: u32, sc_idx: u32) -> usize {
    debug_assert!(sc_idx < nof_prb * NRE);
    (symbol_idx * nof_prb * NRE + sc_idx) as usize
}

/// Flat index of a resource element in an MBSFN subframe grid
pub fn re_idx_mbsfn(nof_prb: u32, symbol_idx: u32, sc_idx: u32, scs: MbsfnScs) -> usize {
    debug_assert!(sc_idx < nof_prb * scs.nre());
    (symbol_idx * nof_prb * scs.nre() + sc_idx) as usize
}

/// Index of the `i`-th pilot of reference symbol `l` in a CRS pilot buffer
pub fn pilot_idx(i: u32, l: u32, nof_prb: u32) -> usize {
    debug_assert!(i < 2 * nof_prb);
    (2 * nof_prb * l + i) as usize
}

/// Index of the `i`-th pilot of reference symbol `l` in an MBSFN pilot buffer
pub fn pilot_idx_mbsfn(i: u32, l: u32, nof_prb: u32, scs: MbsfnScs) -> usize {
    debug_assert!(i < mbsfn_rs_per_symbol(scs) * nof_prb);
    (mbsfn_rs_per_symbol(scs) * nof_prb * l + i) as usize
}

/// Samples in one subframe grid
pub fn sf_len(nof_prb: u32, cp: CyclicPrefix) -> usize {
    (2 * cp.nof_symbols() * nof_prb * NRE) as usize
}

/// Samples in one MBSFN subframe grid at the given numerology
pub fn sf_len_mbsfn(nof_prb: u32, scs: MbsfnScs) -> usize {
    (MBSFN_SF_NSYMB[scs.index()] * nof_prb * scs.nre()) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_re_idx() {
        // Symbol-major layout: one symbol is nof_prb * 12 samples
        assert_eq!(re_idx(6, 0, 0), 0);
        assert_eq!(re_idx(6, 0, 71), 71);
        assert_eq!(re_idx(6, 1, 0), 72);
        assert_eq!(re_idx(25, 3, 10), 3 * 300 + 10);
    }

    #[test]
    fn test_re_idx_mbsfn() {
        assert_eq!(re_idx_mbsfn(6, 1, 0, MbsfnScs::Scs15), 72);
        assert_eq!(re_idx_mbsfn(6, 1, 5, MbsfnScs::Scs1k25), 6 * 144 + 5);
    }

    #[test]
    fn test_pilot_idx() {
        // Two pilots per PRB per reference symbol
        assert_eq!(pilot_idx(0, 0, 6), 0);
        assert_eq!(pilot_idx(11, 0, 6), 11);
        assert_eq!(pilot_idx(0, 1, 6), 12);
        assert_eq!(pilot_idx(3, 3, 50), 300 + 3);
    }

    #[test]
    fn test_pilot_idx_mbsfn() {
        assert_eq!(pilot_idx_mbsfn(0, 1, 6, MbsfnScs::Scs15), 36);
        assert_eq!(pilot_idx_mbsfn(2, 0, 6, MbsfnScs::Scs1k25), 2);
        assert_eq!(pilot_idx_mbsfn(0, 1, 10, MbsfnScs::Scs2k5), 180);
    }

    #[test]
    fn test_sf_len() {
        assert_eq!(sf_len(6, CyclicPrefix::Normal), 14 * 72);
        assert_eq!(sf_len(6, CyclicPrefix::Extended), 12 * 72);
        // The MBSFN region always spans the same bandwidth-time product
        assert_eq!(sf_len_mbsfn(6, MbsfnScs::Scs15), 12 * 72);
        assert_eq!(sf_len_mbsfn(6, MbsfnScs::Scs7k5), 6 * 144);
        assert_eq!(sf_len_mbsfn(6, MbsfnScs::Scs2k5), 2 * 432);
        assert_eq!(sf_len_mbsfn(6, MbsfnScs::Scs1k25), 864);
    }
}
