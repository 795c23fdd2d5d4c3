//! Downlink Reference Signals (CRS and MBSFN RS)
//!
//! Generates the cell-specific reference signal of 3GPP TS 36.211
//! Section 6.10.1 and the MBSFN reference signal of Section 6.10.2, and
//! maps the precomputed pilots into (or out of) flat per-subframe
//! resource grids.
//!
//! Pilots are precomputed once per cell (or MBSFN area) configuration and
//! held in a [`RefSignalDl`] store; per-TTI processing then only runs the
//! put/get index walks.

use crate::resource_grid::{pilot_idx, pilot_idx_mbsfn, re_idx, re_idx_mbsfn, sf_len, sf_len_mbsfn};
use crate::sequence::Sequence;
use crate::PhyError;
use common::types::{
    Cell, CyclicPrefix, DlSfConfig, FrameType, MbsfnScs, TddSfType, MAX_PORTS, MAX_PRB,
    NOF_SF_X_FRAME, NRE, NSLOTS_X_FRAME,
};
use num_complex::Complex32;
use std::f32::consts::FRAC_1_SQRT_2;
use tracing::debug;

const NOF_SF: usize = NOF_SF_X_FRAME as usize;

/// Per-variant MBSFN reference-signal geometry (TS 36.211 Section 6.10.2)
struct ScsGeometry {
    /// Reference symbols per subframe
    nof_symbols: u32,
    /// Reference elements per symbol per resource block
    rs_per_symbol: u32,
    /// OFDM symbols per MBSFN subframe, as used by the sequence seeding
    symbols_per_subframe: u32,
    /// OFDM symbol index of each reference symbol
    nsymbol: [u32; 3],
    /// Base subcarrier offset of each reference symbol
    fidx: [u32; 3],
}

// Indexed by MbsfnScs::index(). The 0.375 kHz row carries provisional
// values inherited from the type-2 MBSFN tables and has not been
// validated against the specification.
const MBSFN_GEOMETRY: [ScsGeometry; 5] = [
    // 15 kHz
    ScsGeometry {
        nof_symbols: 3,
        rs_per_symbol: 6,
        symbols_per_subframe: 6,
        nsymbol: [2, 6, 10],
        fidx: [0, 1, 0],
    },
    // 7.5 kHz
    ScsGeometry {
        nof_symbols: 3,
        rs_per_symbol: 6,
        symbols_per_subframe: 3,
        nsymbol: [1, 3, 5],
        fidx: [0, 2, 0],
    },
    // 2.5 kHz
    ScsGeometry {
        nof_symbols: 2,
        rs_per_symbol: 18,
        symbols_per_subframe: 1,
        nsymbol: [0, 1, 0],
        fidx: [0, 2, 2],
    },
    // 1.25 kHz
    ScsGeometry {
        nof_symbols: 1,
        rs_per_symbol: 24,
        symbols_per_subframe: 1,
        nsymbol: [0, 0, 0],
        fidx: [0, 0, 0],
    },
    // 0.375 kHz
    ScsGeometry {
        nof_symbols: 1,
        rs_per_symbol: 40,
        symbols_per_subframe: 1,
        nsymbol: [0, 0, 0],
        fidx: [0, 0, 0],
    },
];

/// Frequency-domain shift of a port's pilots for reference symbol `l`
pub fn cs_v(port_id: u32, l: u32) -> u32 {
    match port_id {
        0 => {
            if l % 2 == 0 {
                0
            } else {
                3
            }
        }
        1 => {
            if l % 2 == 0 {
                3
            } else {
                0
            }
        }
        2 => {
            if l == 0 {
                0
            } else {
                3
            }
        }
        3 => {
            if l == 0 {
                3
            } else {
                0
            }
        }
        _ => 0,
    }
}

/// OFDM symbol index within the subframe carrying reference symbol `l`
pub fn cs_nsymbol(l: u32, cp: CyclicPrefix, port_id: u32) -> u32 {
    if port_id < 2 {
        if l % 2 == 1 {
            (l / 2 + 1) * cp.nof_symbols() - 3
        } else {
            (l / 2) * cp.nof_symbols()
        }
    } else {
        1 + l * cp.nof_symbols()
    }
}

/// Subcarrier index of the `m`-th pilot of reference symbol `l`
pub fn cs_fidx(cell: &Cell, l: u32, port_id: u32, m: u32) -> u32 {
    6 * m + (cs_v(port_id, l) + cell.id as u32 % 6) % 6
}

/// Reference symbols per subframe for a port, after any TDD reduction
pub fn cs_nof_symbols(cell: &Cell, sf: &DlSfConfig, port_id: u32) -> u32 {
    if cell.frame_type == FrameType::Fdd
        || !sf.tdd_config.configured
        || sf.tdd_config.sf_type(sf.tti % NOF_SF_X_FRAME) == TddSfType::Downlink
    {
        if port_id < 2 {
            4
        } else {
            2
        }
    } else {
        cs_nof_symbols_special(port_id, sf.tdd_config.nof_dw_symbols(cell.cp), cell.cp)
    }
}

/// Reference symbols in a TDD special subframe carrying `nof_dw_symbols`
/// downlink OFDM symbols
pub fn cs_nof_symbols_special(port_id: u32, nof_dw_symbols: u32, cp: CyclicPrefix) -> u32 {
    let (four, three, two) = if cp.is_normal() { (12, 9, 5) } else { (10, 8, 4) };
    if nof_dw_symbols >= four {
        if port_id < 2 {
            4
        } else {
            2
        }
    } else if nof_dw_symbols >= three {
        if port_id < 2 {
            3
        } else {
            2
        }
    } else if nof_dw_symbols >= two {
        if port_id < 2 {
            2
        } else {
            1
        }
    } else {
        1
    }
}

/// Pilot resource elements per slot for the configured port count
pub fn cs_nof_pilots_x_slot(nof_ports: u32) -> u32 {
    match nof_ports {
        2 => 8,
        4 => 12,
        _ => 4,
    }
}

/// Pilot resource elements in one subframe for a port
pub fn cs_nof_re(cell: &Cell, sf: &DlSfConfig, port_id: u32) -> u32 {
    cs_nof_symbols(cell, sf, port_id) * 2 * cell.nof_prb
}

/// MBSFN reference symbols per subframe
pub fn mbsfn_nof_symbols(scs: MbsfnScs) -> u32 {
    MBSFN_GEOMETRY[scs.index()].nof_symbols
}

/// MBSFN reference elements per symbol per resource block
pub fn mbsfn_rs_per_symbol(scs: MbsfnScs) -> u32 {
    MBSFN_GEOMETRY[scs.index()].rs_per_symbol
}

/// MBSFN reference elements per resource block per subframe
pub fn mbsfn_rs_per_rb(scs: MbsfnScs) -> u32 {
    let geom = &MBSFN_GEOMETRY[scs.index()];
    geom.nof_symbols * geom.rs_per_symbol
}

/// OFDM symbols per MBSFN subframe, as consumed by the sequence seeding
pub fn symbols_per_mbsfn_subframe(scs: MbsfnScs) -> u32 {
    MBSFN_GEOMETRY[scs.index()].symbols_per_subframe
}

/// OFDM symbol index of MBSFN reference symbol `l`
pub fn mbsfn_nsymbol(l: u32, scs: MbsfnScs) -> u32 {
    MBSFN_GEOMETRY[scs.index()].nsymbol[l as usize]
}

/// Base subcarrier offset of MBSFN reference symbol `l`
pub fn mbsfn_fidx(l: u32, scs: MbsfnScs) -> u32 {
    MBSFN_GEOMETRY[scs.index()].fidx[l as usize]
}

/// Slot/subframe-dependent extra frequency offset of MBSFN reference
/// symbol `l` (TS 36.211 Table 6.10.2.2-1).
///
/// Not consumed by the put/get paths, which realize the base layout only;
/// estimators implementing the staggered layout must validate this table
/// before relying on it.
pub fn mbsfn_offset(l: u32, slot: u32, sf_idx: u32, scs: MbsfnScs) -> u32 {
    match scs {
        MbsfnScs::Scs15 => {
            if slot == 1 && l == 0 {
                1
            } else {
                0
            }
        }
        MbsfnScs::Scs7k5 => {
            if slot == 1 && l == 0 {
                2
            } else {
                0
            }
        }
        MbsfnScs::Scs2k5 => {
            if slot == 1 {
                2
            } else {
                0
            }
        }
        MbsfnScs::Scs1k25 => {
            if sf_idx % 2 != 0 {
                3
            } else {
                0
            }
        }
        MbsfnScs::Scs0k375 => 0,
    }
}

/// Maximum CRS pilots per port group per subframe at `max_prb`
pub fn max_num_pilots_sf(max_prb: u32) -> usize {
    (4 * 2 * max_prb) as usize
}

/// Pilots produced by a combined CRS+MBSFN subframe extraction
pub fn num_pilots_sf_mbsfn(nof_prb: u32, scs: MbsfnScs) -> usize {
    ((2 + mbsfn_rs_per_rb(scs)) * nof_prb) as usize
}

/// Which reference signal a store currently holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefSignalType {
    Cs,
    Mbsfn,
}

/// Precomputed downlink reference-signal pilots for one cell or MBSFN area.
///
/// Pilots are held per antenna-port group ({0,1} and {2,3}) and per
/// subframe, in buffers sized at creation for `max_prb` so that
/// reconfiguration never reallocates. Configuration
/// ([`set_cell`](RefSignalDl::set_cell) /
/// [`mbsfn_set_cell`](RefSignalDl::mbsfn_set_cell)) requires exclusive
/// access; a configured store is immutable under put/get and safe to read
/// from multiple threads.
pub struct RefSignalDl {
    sig_type: RefSignalType,
    max_prb: u32,
    cell: Option<Cell>,
    mbsfn_area_id: Option<u16>,
    scs: MbsfnScs,
    pilots: [[Vec<Complex32>; NOF_SF]; 2],
}

impl RefSignalDl {
    /// Allocate pilot buffers for the cell-specific reference signal.
    ///
    /// Buffers are oversized to the combined CRS+MBSFN maximum so the same
    /// store can feed the CRS part of [`mbsfn_put_sf`].
    pub fn cs_init(max_prb: u32) -> Result<Self, PhyError> {
        let buf_len = max_num_pilots_sf(max_prb)
            + (mbsfn_rs_per_rb(MbsfnScs::Scs15) * max_prb) as usize;
        Self::init(RefSignalType::Cs, max_prb, MbsfnScs::Scs15, buf_len)
    }

    /// Allocate pilot buffers for the MBSFN reference signal
    pub fn mbsfn_init(max_prb: u32, scs: MbsfnScs) -> Result<Self, PhyError> {
        let buf_len = (mbsfn_rs_per_rb(scs) * max_prb) as usize;
        Self::init(RefSignalType::Mbsfn, max_prb, scs, buf_len)
    }

    fn init(
        sig_type: RefSignalType,
        max_prb: u32,
        scs: MbsfnScs,
        buf_len: usize,
    ) -> Result<Self, PhyError> {
        if max_prb == 0 || max_prb > MAX_PRB {
            return Err(PhyError::InvalidInput(format!(
                "max_prb {} out of range (1-{})",
                max_prb, MAX_PRB
            )));
        }
        let mut pilots: [[Vec<Complex32>; NOF_SF]; 2] = Default::default();
        for group in pilots.iter_mut() {
            for buf in group.iter_mut() {
                buf.try_reserve_exact(buf_len).map_err(|e| {
                    PhyError::AllocationFailure(format!("pilot buffer of {} samples: {}", buf_len, e))
                })?;
                buf.resize(buf_len, Complex32::new(0.0, 0.0));
            }
        }
        Ok(Self {
            sig_type,
            max_prb,
            cell: None,
            mbsfn_area_id: None,
            scs,
            pilots,
        })
    }

    /// Configured maximum resource blocks
    pub fn max_prb(&self) -> u32 {
        self.max_prb
    }

    /// Which reference signal this store holds
    pub fn sig_type(&self) -> RefSignalType {
        self.sig_type
    }

    /// Currently configured cell, if any
    pub fn cell(&self) -> Option<Cell> {
        self.cell
    }

    /// Stored pilots for one port group (0 for ports {0,1}, 1 for {2,3})
    /// and subframe
    pub fn pilots(&self, port_group: usize, sf_idx: usize) -> &[Complex32] {
        debug_assert!(port_group < 2 && sf_idx < NOF_SF);
        &self.pilots[port_group][sf_idx]
    }

    /// Precompute the CRS pilots for `cell` (TS 36.211 Section 6.10.1.1).
    ///
    /// Regenerates only when the cell identity changes; re-invoking with
    /// the same identity is a no-op since generation is deterministic.
    pub fn set_cell(&mut self, cell: Cell) -> Result<(), PhyError> {
        if self.sig_type != RefSignalType::Cs {
            return Err(PhyError::InvalidInput("store holds MBSFN pilots".into()));
        }
        if !cell.is_valid() || cell.nof_prb > self.max_prb {
            return Err(PhyError::InvalidInput(format!(
                "invalid cell configuration: {:?}",
                cell
            )));
        }
        if let Some(current) = self.cell {
            if current.id == cell.id {
                return Ok(());
            }
        }

        // Allocate the sequence buffer before touching the store, so a
        // failure leaves the previous configuration intact
        let seq_len = (2 * 2 * MAX_PRB) as usize;
        let mut seq = Sequence::new(seq_len)?;

        let n_cp: u32 = if cell.cp.is_normal() { 1 } else { 0 };
        let sf_dflt = DlSfConfig::default();

        for ns in 0..NSLOTS_X_FRAME {
            for p in 0..2u32 {
                // Generation always fills the full downlink symbol count;
                // TDD special subframes read fewer symbols at put/get time
                let nsymbols = cs_nof_symbols(&cell, &sf_dflt, 2 * p) / 2;
                for l in 0..nsymbols {
                    let lp = cs_nsymbol(l, cell.cp, 2 * p);
                    let c_init = 1024 * (7 * (ns + 1) + lp + 1) * (2 * cell.id as u32 + 1)
                        + 2 * cell.id as u32
                        + n_cp;
                    seq.set_lte_pr(seq_len, c_init)?;
                    let bits = seq.bits();

                    let sf_pilots = &mut self.pilots[p as usize][(ns / 2) as usize];
                    for i in 0..2 * cell.nof_prb {
                        let idx = pilot_idx(i, (ns % 2) * nsymbols + l, cell.nof_prb);
                        // Center the configured bandwidth within the
                        // maximum-bandwidth sequence
                        let mp = (i + MAX_PRB - cell.nof_prb) as usize;
                        sf_pilots[idx] = Complex32::new(
                            (1 - 2 * i32::from(bits[2 * mp])) as f32 * FRAC_1_SQRT_2,
                            (1 - 2 * i32::from(bits[2 * mp + 1])) as f32 * FRAC_1_SQRT_2,
                        );
                    }
                }
            }
        }

        self.cell = Some(cell);
        debug!(
            "Generated CRS pilots for cell {} ({} PRB)",
            cell.id, cell.nof_prb
        );
        Ok(())
    }

    /// Precompute the MBSFN pilots for `cell` and `area_id`
    /// (TS 36.211 Section 6.10.2.1).
    ///
    /// Regenerates only when the cell identity, area identity or
    /// subcarrier-spacing variant changes.
    pub fn mbsfn_set_cell(
        &mut self,
        cell: Cell,
        area_id: u16,
        scs: MbsfnScs,
    ) -> Result<(), PhyError> {
        if self.sig_type != RefSignalType::Mbsfn {
            return Err(PhyError::InvalidInput("store holds CRS pilots".into()));
        }
        if !cell.is_valid() || cell.nof_prb > self.max_prb {
            return Err(PhyError::InvalidInput(format!(
                "invalid cell configuration: {:?}",
                cell
            )));
        }
        let needed = (mbsfn_rs_per_rb(scs) * cell.nof_prb) as usize;
        if needed > self.pilots[0][0].len() {
            return Err(PhyError::InvalidInput(format!(
                "variant {:?} needs {} pilots per subframe, store holds {}",
                scs,
                needed,
                self.pilots[0][0].len()
            )));
        }
        if let (Some(current), Some(current_area)) = (self.cell, self.mbsfn_area_id) {
            if current.id == cell.id && current_area == area_id && self.scs == scs {
                return Ok(());
            }
        }

        let geom = &MBSFN_GEOMETRY[scs.index()];
        let seq_max = (20 * mbsfn_rs_per_rb(scs) * MAX_PRB) as usize;
        let seq_len = (10 * mbsfn_rs_per_rb(scs) * MAX_PRB) as usize;
        let mut seq = Sequence::new(seq_max)?;

        for ns in 0..NOF_SF_X_FRAME {
            for p in 0..2usize {
                for l in 0..geom.nof_symbols {
                    // The two narrowest-symbol variants address slot and
                    // symbol directly by subframe and loop index
                    let (slot, lp) = match scs {
                        MbsfnScs::Scs2k5 | MbsfnScs::Scs1k25 => (ns, l),
                        _ => (
                            ns * 2 + u32::from(l > 0),
                            mbsfn_nsymbol(l, scs) % symbols_per_mbsfn_subframe(scs),
                        ),
                    };
                    // Seed arithmetic wraps modulo 2^32 for large area ids
                    let c_init = 512u32
                        .wrapping_mul(7 * (slot + 1) + lp + 1)
                        .wrapping_mul(2 * area_id as u32 + 1)
                        .wrapping_add(area_id as u32);
                    seq.set_lte_pr(seq_len, c_init)?;
                    let bits = seq.bits();

                    let sf_pilots = &mut self.pilots[p][ns as usize];
                    for i in 0..geom.rs_per_symbol * cell.nof_prb {
                        let idx = pilot_idx_mbsfn(i, l, cell.nof_prb, scs);
                        let mp = if scs == MbsfnScs::Scs2k5 {
                            // Quarter-density centering for this variant
                            let delta = (MAX_PRB - cell.nof_prb) as f32 / 2.0;
                            (i as f32 + scs.nre() as f32 / 4.0 * delta) as usize
                        } else {
                            (i + 3 * (MAX_PRB - cell.nof_prb)) as usize
                        };
                        sf_pilots[idx] = Complex32::new(
                            (1 - 2 * i32::from(bits[2 * mp])) as f32 * FRAC_1_SQRT_2,
                            (1 - 2 * i32::from(bits[2 * mp + 1])) as f32 * FRAC_1_SQRT_2,
                        );
                    }
                }
            }
        }

        self.cell = Some(cell);
        self.mbsfn_area_id = Some(area_id);
        self.scs = scs;
        debug!(
            "Generated MBSFN pilots for cell {} area {} ({:?})",
            cell.id, area_id, scs
        );
        Ok(())
    }

    /// Map the stored CRS pilots for one subframe into a resource grid
    pub fn cs_put_sf(
        &self,
        sf: &DlSfConfig,
        port_id: u32,
        sf_symbols: &mut [Complex32],
    ) -> Result<(), PhyError> {
        let cell = self.checked_cs(port_id)?;
        let grid_len = sf_len(cell.nof_prb, cell.cp);
        if sf_symbols.len() < grid_len {
            return Err(PhyError::InvalidInput(format!(
                "grid of {} samples, {} required",
                sf_symbols.len(),
                grid_len
            )));
        }

        let pilots = &self.pilots[(port_id / 2) as usize][(sf.tti % NOF_SF_X_FRAME) as usize];
        for l in 0..cs_nof_symbols(&cell, sf, port_id) {
            let nsymbol = cs_nsymbol(l, cell.cp, port_id);
            let mut fidx = cs_fidx(&cell, l, port_id, 0);
            for i in 0..2 * cell.nof_prb {
                sf_symbols[re_idx(cell.nof_prb, nsymbol, fidx)] =
                    pilots[pilot_idx(i, l, cell.nof_prb)];
                fidx += NRE / 2; // one reference every 6 subcarriers
            }
        }
        Ok(())
    }

    /// Extract the CRS resource elements of one subframe from a resource
    /// grid into a caller-provided pilot buffer
    pub fn cs_get_sf(
        &self,
        sf: &DlSfConfig,
        port_id: u32,
        sf_symbols: &[Complex32],
        pilots: &mut [Complex32],
    ) -> Result<(), PhyError> {
        let cell = self.checked_cs(port_id)?;
        let grid_len = sf_len(cell.nof_prb, cell.cp);
        let nof_re = cs_nof_re(&cell, sf, port_id) as usize;
        if sf_symbols.len() < grid_len || pilots.len() < nof_re {
            return Err(PhyError::InvalidInput(format!(
                "grid of {} samples ({} required), pilot buffer of {} ({} required)",
                sf_symbols.len(),
                grid_len,
                pilots.len(),
                nof_re
            )));
        }

        for l in 0..cs_nof_symbols(&cell, sf, port_id) {
            let nsymbol = cs_nsymbol(l, cell.cp, port_id);
            let mut fidx = cs_fidx(&cell, l, port_id, 0);
            for i in 0..2 * cell.nof_prb {
                pilots[pilot_idx(i, l, cell.nof_prb)] =
                    sf_symbols[re_idx(cell.nof_prb, nsymbol, fidx)];
                fidx += NRE / 2;
            }
        }
        Ok(())
    }

    fn checked_cs(&self, port_id: u32) -> Result<Cell, PhyError> {
        if port_id >= MAX_PORTS {
            return Err(PhyError::InvalidInput(format!(
                "port {} out of range (0-{})",
                port_id,
                MAX_PORTS - 1
            )));
        }
        if self.sig_type != RefSignalType::Cs {
            return Err(PhyError::InvalidInput("store holds MBSFN pilots".into()));
        }
        self.cell
            .ok_or_else(|| PhyError::InvalidInput("no cell configured".into()))
    }
}

fn check_cell_and_port(cell: &Cell, port_id: u32) -> Result<(), PhyError> {
    if !cell.is_valid() {
        return Err(PhyError::InvalidInput(format!(
            "invalid cell configuration: {:?}",
            cell
        )));
    }
    if port_id >= MAX_PORTS {
        return Err(PhyError::InvalidInput(format!(
            "port {} out of range (0-{})",
            port_id,
            MAX_PORTS - 1
        )));
    }
    Ok(())
}

/// Map one combined CRS+MBSFN subframe into a resource grid.
///
/// Writes the leading non-MBSFN CRS symbol from `cs_pilots`, then the
/// MBSFN reference symbols from `mbsfn_pilots`. The combined subframe is
/// only defined for the in-band 15 kHz numerology.
pub fn mbsfn_put_sf(
    cell: &Cell,
    port_id: u32,
    cs_pilots: &[Complex32],
    mbsfn_pilots: &[Complex32],
    sf_symbols: &mut [Complex32],
) -> Result<(), PhyError> {
    let scs = MbsfnScs::Scs15;
    check_cell_and_port(cell, port_id)?;
    let grid_len = sf_len_mbsfn(cell.nof_prb, scs);
    if cs_pilots.len() < (2 * cell.nof_prb) as usize
        || mbsfn_pilots.len() < (mbsfn_rs_per_rb(scs) * cell.nof_prb) as usize
        || sf_symbols.len() < grid_len
    {
        return Err(PhyError::InvalidInput(
            "pilot or grid buffer too short for the configured bandwidth".into(),
        ));
    }

    // CRS on the leading non-MBSFN symbol of the subframe
    let mut fidx = cs_fidx(cell, 0, port_id, 0);
    for i in 0..2 * cell.nof_prb {
        sf_symbols[re_idx(cell.nof_prb, 0, fidx)] = cs_pilots[pilot_idx(i, 0, cell.nof_prb)];
        fidx += NRE / 2;
    }

    for l in 0..mbsfn_nof_symbols(scs) {
        let nsymbol = mbsfn_nsymbol(l, scs);
        let mut fidx = mbsfn_fidx(l, scs);
        for i in 0..mbsfn_rs_per_symbol(scs) * cell.nof_prb {
            sf_symbols[re_idx_mbsfn(cell.nof_prb, nsymbol, fidx, scs)] =
                mbsfn_pilots[pilot_idx_mbsfn(i, l, cell.nof_prb, scs)];
            fidx += scs.nre() / mbsfn_rs_per_symbol(scs);
        }
    }
    Ok(())
}

/// Extract the pilots of one combined subframe from a resource grid.
///
/// For the 15 kHz variant, the leading non-MBSFN CRS symbol is extracted
/// first and the MBSFN pilots are appended after it, yielding one
/// contiguous output ordering. For the 1.25 kHz variant the frequency
/// offset alternates with subframe-index parity.
pub fn mbsfn_get_sf(
    cell: &Cell,
    port_id: u32,
    sf_symbols: &[Complex32],
    pilots: &mut [Complex32],
    scs: MbsfnScs,
    sf_idx: u32,
) -> Result<(), PhyError> {
    check_cell_and_port(cell, port_id)?;
    let mut required = (mbsfn_rs_per_rb(scs) * cell.nof_prb) as usize;
    if scs == MbsfnScs::Scs15 {
        required = num_pilots_sf_mbsfn(cell.nof_prb, scs);
    }
    if sf_symbols.len() < sf_len_mbsfn(cell.nof_prb, scs) || pilots.len() < required {
        return Err(PhyError::InvalidInput(
            "pilot or grid buffer too short for the configured bandwidth".into(),
        ));
    }

    let mut non_mbsfn_offset = 0usize;
    if scs == MbsfnScs::Scs15 {
        let nsymbol = cs_nsymbol(0, cell.cp, port_id);
        let mut fidx = cs_fidx(cell, 0, port_id, 0);
        for i in 0..2 * cell.nof_prb {
            pilots[pilot_idx(i, 0, cell.nof_prb)] = sf_symbols[re_idx(cell.nof_prb, nsymbol, fidx)];
            fidx += NRE / 2;
        }
        non_mbsfn_offset = (2 * cell.nof_prb) as usize;
    }

    for l in 0..mbsfn_nof_symbols(scs) {
        let nsymbol = mbsfn_nsymbol(l, scs);
        let mut fidx = if scs == MbsfnScs::Scs1k25 {
            if sf_idx % 2 == 0 {
                0
            } else {
                3
            }
        } else {
            mbsfn_fidx(l, scs)
        };
        for i in 0..mbsfn_rs_per_symbol(scs) * cell.nof_prb {
            pilots[pilot_idx_mbsfn(i, l, cell.nof_prb, scs) + non_mbsfn_offset] =
                sf_symbols[re_idx_mbsfn(cell.nof_prb, nsymbol, fidx, scs)];
            fidx += scs.nre() / mbsfn_rs_per_symbol(scs);
        }
    }
    Ok(())
}
