#![forbid(unsafe_code)]
//! QR Code Model 2 symbol encoding.
//!
//! Encodes arbitrary bytes into a square grid of dark and light modules, covering versions
//! 1 to 40 and all four error correction levels. Payloads in this crate are UTF-8 JSON, so
//! only byte-mode segments are produced; numeric and alphanumeric optimisation would not
//! shorten them.
//!
//! # Example
//!
//! ```rust
//! use qiprofile::qrcode::{QrCode, QrCodeEcc, Version};
//!
//! let qr = QrCode::encode_bytes(b"Hello, World!", QrCodeEcc::High, Version::MIN, Version::MAX, None, false)
//!     .unwrap();
//! assert_eq!(qr.size(), qr.version().value() as i32 * 4 + 17);
//! ```

use serde::{Deserialize, Serialize};

/// A QR Code symbol. Immutable once encoded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QrCode {
    version: Version,

    /// Width and height in modules, `version * 4 + 17`.
    size: i32,

    ecl: QrCodeEcc,

    mask: Mask,

    /// Row-major module colours, `true` is dark.
    modules: Vec<bool>,

    /// Marks finder, timing, alignment, format and version modules. Emptied after encoding.
    isfunction: Vec<bool>,
}

impl QrCode {
    /// Encodes `data` as a single byte-mode segment.
    ///
    /// The smallest version in `minversion..=maxversion` that holds the data is chosen. When
    /// `boostecl` is set the error correction level is raised as long as the version does not
    /// grow. `mask` of `None` picks the pattern with the lowest penalty score.
    ///
    /// # Errors
    ///
    /// Returns [`DataTooLong`] when the data does not fit `maxversion` at `ecl`.
    pub fn encode_bytes(
        data: &[u8],
        ecl: QrCodeEcc,
        minversion: Version,
        maxversion: Version,
        mask: Option<Mask>,
        boostecl: bool,
    ) -> Result<Self, DataTooLong> {
        if minversion > maxversion {
            return Err(DataTooLong::InvalidRange(minversion, maxversion));
        }

        let mut version = minversion;
        let datausedbits = loop {
            let capacitybits = num_data_codewords(version, ecl) * 8;
            let used = byte_segment_bits(data.len(), version);
            match used {
                Some(n) if n <= capacitybits => break n,
                _ if version >= maxversion => {
                    return Err(match used {
                        None => DataTooLong::SegmentTooLong,
                        Some(n) => DataTooLong::DataOverCapacity(n, capacitybits),
                    });
                }
                _ => version = Version::new(version.value() + 1),
            }
        };

        let mut ecl = ecl;
        for newecl in [QrCodeEcc::Medium, QrCodeEcc::Quartile, QrCodeEcc::High] {
            if boostecl && newecl > ecl && datausedbits <= num_data_codewords(version, newecl) * 8 {
                ecl = newecl;
            }
        }

        let capacitybits = num_data_codewords(version, ecl) * 8;
        let mut bb = BitBuffer::default();
        bb.append_bits(BYTE_MODE_BITS, 4);
        bb.append_bits(data.len() as u32, byte_count_bits(version));
        for &b in data {
            bb.append_bits(u32::from(b), 8);
        }
        debug_assert_eq!(bb.len(), datausedbits);

        // Terminator, then pad to a byte boundary
        let numzerobits = 4.min(capacitybits - bb.len());
        bb.append_bits(0, numzerobits as u8);
        let numzerobits = bb.len().wrapping_neg() & 7;
        bb.append_bits(0, numzerobits as u8);

        for padbyte in [0xEC, 0x11].into_iter().cycle() {
            if bb.len() >= capacitybits {
                break;
            }
            bb.append_bits(padbyte, 8);
        }

        Ok(Self::encode_codewords(version, ecl, &bb.into_bytes(), mask))
    }

    /// Builds a symbol from already-padded data codewords.
    fn encode_codewords(version: Version, ecl: QrCodeEcc, datacodewords: &[u8], mask: Option<Mask>) -> Self {
        let size = i32::from(version.value()) * 4 + 17;
        let area = (size * size) as usize;
        let mut result = Self {
            version,
            size,
            ecl,
            mask: Mask::new(0),
            modules: vec![false; area],
            isfunction: vec![false; area],
        };
        result.draw_function_patterns();
        let allcodewords = result.add_ecc_and_interleave(datacodewords);
        result.draw_codewords(&allcodewords);

        let mask = mask.unwrap_or_else(|| {
            let mut best = Mask::new(0);
            let mut minpenalty = i32::MAX;
            for i in 0u8..8 {
                let candidate = Mask::new(i);
                result.apply_mask(candidate);
                result.draw_format_bits(candidate);
                let penalty = result.penalty_score();
                if penalty < minpenalty {
                    best = candidate;
                    minpenalty = penalty;
                }
                result.apply_mask(candidate); // XOR undoes it
            }
            best
        });
        result.mask = mask;
        result.apply_mask(mask);
        result.draw_format_bits(mask);
        result.isfunction = Vec::new();
        result
    }

    /// This symbol's version, in the range [1, 40].
    pub fn version(&self) -> Version {
        self.version
    }

    /// Width and height in modules, in the range [21, 177].
    pub fn size(&self) -> i32 {
        self.size
    }

    pub fn error_correction_level(&self) -> QrCodeEcc {
        self.ecl
    }

    pub fn mask(&self) -> Mask {
        self.mask
    }

    /// Colour of the module at (`x`, `y`); `true` is dark. Out-of-range coordinates are light,
    /// which lets renderers draw the quiet zone without bounds checks.
    pub fn get_module(&self, x: i32, y: i32) -> bool {
        (0..self.size).contains(&x) && (0..self.size).contains(&y) && self.module(x, y)
    }

    fn module(&self, x: i32, y: i32) -> bool {
        self.modules[(y * self.size + x) as usize]
    }

    fn set_function_module(&mut self, x: i32, y: i32, isdark: bool) {
        let index = (y * self.size + x) as usize;
        self.modules[index] = isdark;
        self.isfunction[index] = true;
    }

    fn draw_function_patterns(&mut self) {
        let size = self.size;
        for i in 0..size {
            self.set_function_module(6, i, i % 2 == 0);
            self.set_function_module(i, 6, i % 2 == 0);
        }

        self.draw_finder_pattern(3, 3);
        self.draw_finder_pattern(size - 4, 3);
        self.draw_finder_pattern(3, size - 4);

        let alignpatpos = self.alignment_pattern_positions();
        let last = alignpatpos.len().saturating_sub(1);
        for (i, &x) in alignpatpos.iter().enumerate() {
            for (j, &y) in alignpatpos.iter().enumerate() {
                // Skip the three corners occupied by finder patterns
                if (i == 0 && j == 0) || (i == 0 && j == last) || (i == last && j == 0) {
                    continue;
                }
                self.draw_alignment_pattern(x, y);
            }
        }

        // Reserve the format area; the real bits are drawn once the mask is known
        self.draw_format_bits(Mask::new(0));
        self.draw_version();
    }

    fn draw_finder_pattern(&mut self, x: i32, y: i32) {
        for dy in -4..=4 {
            for dx in -4..=4 {
                let (xx, yy) = (x + dx, y + dy);
                if (0..self.size).contains(&xx) && (0..self.size).contains(&yy) {
                    let dist = dx.abs().max(dy.abs());
                    self.set_function_module(xx, yy, dist != 2 && dist != 4);
                }
            }
        }
    }

    fn draw_alignment_pattern(&mut self, x: i32, y: i32) {
        for dy in -2..=2 {
            for dx in -2..=2 {
                self.set_function_module(x + dx, y + dy, dx.abs().max(dy.abs()) != 1);
            }
        }
    }

    fn draw_format_bits(&mut self, mask: Mask) {
        let bits: u32 = {
            let data = u32::from((self.ecl.format_bits() << 3) | mask.value());
            let mut rem = data;
            for _ in 0..10 {
                rem = (rem << 1) ^ ((rem >> 9) * 0x537);
            }
            ((data << 10) | rem) ^ 0x5412
        };

        // Copy around the top-left finder
        for i in 0..6 {
            self.set_function_module(8, i, get_bit(bits, i));
        }
        self.set_function_module(8, 7, get_bit(bits, 6));
        self.set_function_module(8, 8, get_bit(bits, 7));
        self.set_function_module(7, 8, get_bit(bits, 8));
        for i in 9..15 {
            self.set_function_module(14 - i, 8, get_bit(bits, i));
        }

        // Split copy along the other two finders
        let size = self.size;
        for i in 0..8 {
            self.set_function_module(size - 1 - i, 8, get_bit(bits, i));
        }
        for i in 8..15 {
            self.set_function_module(8, size - 15 + i, get_bit(bits, i));
        }
        self.set_function_module(8, size - 8, true);
    }

    fn draw_version(&mut self) {
        let ver = u32::from(self.version.value());
        if ver < 7 {
            return;
        }
        let bits: u32 = {
            let mut rem = ver;
            for _ in 0..12 {
                rem = (rem << 1) ^ ((rem >> 11) * 0x1F25);
            }
            (ver << 12) | rem
        };
        for i in 0..18 {
            let bit = get_bit(bits, i);
            let a = self.size - 11 + i % 3;
            let b = i / 3;
            self.set_function_module(a, b, bit);
            self.set_function_module(b, a, bit);
        }
    }

    fn alignment_pattern_positions(&self) -> Vec<i32> {
        let ver = i32::from(self.version.value());
        if ver == 1 {
            return Vec::new();
        }
        let numalign = ver / 7 + 2;
        let step = if ver == 32 {
            26
        } else {
            ((ver * 4 + numalign * 2 + 1) / (numalign * 2 - 2)) * 2
        };
        let mut result: Vec<i32> = (0..numalign - 1).map(|i| self.size - 7 - i * step).collect();
        result.push(6);
        result.reverse();
        result
    }

    /// Splits the data into blocks, appends Reed-Solomon ECC to each and interleaves them.
    fn add_ecc_and_interleave(&self, data: &[u8]) -> Vec<u8> {
        let (ver, ecl) = (self.version, self.ecl);
        debug_assert_eq!(data.len(), num_data_codewords(ver, ecl));
        let numblocks = table_get(&NUM_ERROR_CORRECTION_BLOCKS, ver, ecl);
        let blockecclen = table_get(&ECC_CODEWORDS_PER_BLOCK, ver, ecl);
        let rawcodewords = num_raw_data_modules(ver) / 8;
        let numshortblocks = numblocks - rawcodewords % numblocks;
        let shortblocklen = rawcodewords / numblocks;

        let rs = ReedSolomonGenerator::new(blockecclen);
        let mut blocks: Vec<Vec<u8>> = Vec::with_capacity(numblocks);
        let mut rest = data;
        for i in 0..numblocks {
            let datlen = shortblocklen - blockecclen + usize::from(i >= numshortblocks);
            let (dat, tail) = rest.split_at(datlen);
            rest = tail;
            let mut block = dat.to_vec();
            let ecc = rs.compute_remainder(dat);
            if i < numshortblocks {
                // Placeholder keeps every block the same length for interleaving
                block.push(0);
            }
            block.extend_from_slice(&ecc);
            blocks.push(block);
        }

        let mut result = Vec::with_capacity(rawcodewords);
        for i in 0..=shortblocklen {
            for (j, block) in blocks.iter().enumerate() {
                if i != shortblocklen - blockecclen || j >= numshortblocks {
                    result.push(block[i]);
                }
            }
        }
        result
    }

    /// Zigzags the codeword bits over every non-function module.
    fn draw_codewords(&mut self, data: &[u8]) {
        debug_assert_eq!(data.len(), num_raw_data_modules(self.version) / 8);
        let size = self.size;
        let totalbits = data.len() * 8;
        let mut i = 0usize;
        let mut right = size - 1;
        while right >= 1 {
            if right == 6 {
                right = 5;
            }
            for vert in 0..size {
                for j in 0..2 {
                    let x = right - j;
                    let upward = ((right + 1) & 2) == 0;
                    let y = if upward { size - 1 - vert } else { vert };
                    let index = (y * size + x) as usize;
                    if !self.isfunction[index] && i < totalbits {
                        self.modules[index] = get_bit(u32::from(data[i >> 3]), 7 - (i & 7) as i32);
                        i += 1;
                    }
                }
            }
            right -= 2;
        }
        debug_assert_eq!(i, totalbits);
    }

    fn apply_mask(&mut self, mask: Mask) {
        let size = self.size;
        for y in 0..size {
            for x in 0..size {
                let invert = match mask.value() {
                    0 => (x + y) % 2 == 0,
                    1 => y % 2 == 0,
                    2 => x % 3 == 0,
                    3 => (x + y) % 3 == 0,
                    4 => (x / 3 + y / 2) % 2 == 0,
                    5 => (x * y) % 2 + (x * y) % 3 == 0,
                    6 => ((x * y) % 2 + (x * y) % 3) % 2 == 0,
                    7 => ((x + y) % 2 + (x * y) % 3) % 2 == 0,
                    _ => unreachable!(),
                };
                let index = (y * size + x) as usize;
                self.modules[index] ^= invert && !self.isfunction[index];
            }
        }
    }

    fn penalty_score(&self) -> i32 {
        let mut result = 0;
        let size = self.size;

        // Runs and finder-like patterns, rows then columns
        for transpose in [false, true] {
            for a in 0..size {
                let mut runcolor = false;
                let mut runlen = 0;
                let mut runhistory = FinderPenalty::new(size);
                for b in 0..size {
                    let color = if transpose { self.module(a, b) } else { self.module(b, a) };
                    if color == runcolor {
                        runlen += 1;
                        if runlen == 5 {
                            result += PENALTY_N1;
                        } else if runlen > 5 {
                            result += 1;
                        }
                    } else {
                        runhistory.add_history(runlen);
                        if !runcolor {
                            result += runhistory.count_patterns() * PENALTY_N3;
                        }
                        runcolor = color;
                        runlen = 1;
                    }
                }
                result += runhistory.terminate_and_count(runcolor, runlen) * PENALTY_N3;
            }
        }

        for y in 0..size - 1 {
            for x in 0..size - 1 {
                let color = self.module(x, y);
                if color == self.module(x + 1, y)
                    && color == self.module(x, y + 1)
                    && color == self.module(x + 1, y + 1)
                {
                    result += PENALTY_N2;
                }
            }
        }

        let dark = self.modules.iter().filter(|&&m| m).count() as i32;
        let total = size * size;
        let k = ((dark * 20 - total * 10).abs() + total - 1) / total - 1;
        result + k * PENALTY_N4
    }
}

/// Largest payload, in bytes, that one byte-mode segment can carry at `ecl` within `maxversion`.
pub fn byte_capacity(ecl: QrCodeEcc, maxversion: Version) -> usize {
    let bits = num_data_codewords(maxversion, ecl) * 8 - 4 - usize::from(byte_count_bits(maxversion));
    bits / 8
}

const BYTE_MODE_BITS: u32 = 0x4;

fn byte_count_bits(ver: Version) -> u8 {
    if ver.value() <= 9 {
        8
    } else {
        16
    }
}

/// Bits a byte segment of `len` bytes needs at `ver`, or `None` if the count field overflows.
fn byte_segment_bits(len: usize, ver: Version) -> Option<usize> {
    let ccbits = byte_count_bits(ver);
    if len >= 1usize << ccbits {
        return None;
    }
    len.checked_mul(8)?.checked_add(4 + usize::from(ccbits))
}

fn num_raw_data_modules(ver: Version) -> usize {
    let ver = usize::from(ver.value());
    let mut result = (16 * ver + 128) * ver + 64;
    if ver >= 2 {
        let numalign = ver / 7 + 2;
        result -= (25 * numalign - 10) * numalign - 55;
        if ver >= 7 {
            result -= 36;
        }
    }
    result
}

fn num_data_codewords(ver: Version, ecl: QrCodeEcc) -> usize {
    num_raw_data_modules(ver) / 8
        - table_get(&ECC_CODEWORDS_PER_BLOCK, ver, ecl) * table_get(&NUM_ERROR_CORRECTION_BLOCKS, ver, ecl)
}

fn table_get(table: &'static [[i8; 41]; 4], ver: Version, ecl: QrCodeEcc) -> usize {
    table[ecl.ordinal()][usize::from(ver.value())] as usize
}

struct ReedSolomonGenerator {
    divisor: Vec<u8>,
}

impl ReedSolomonGenerator {
    fn new(degree: usize) -> Self {
        let mut divisor = vec![0u8; degree];
        divisor[degree - 1] = 1;
        let mut root: u8 = 1;
        for _ in 0..degree {
            for j in 0..degree {
                divisor[j] = Self::multiply(divisor[j], root);
                if j + 1 < degree {
                    divisor[j] ^= divisor[j + 1];
                }
            }
            root = Self::multiply(root, 0x02);
        }
        Self { divisor }
    }

    fn compute_remainder(&self, data: &[u8]) -> Vec<u8> {
        let mut result = vec![0u8; self.divisor.len()];
        for &b in data {
            let factor = b ^ result[0];
            result.rotate_left(1);
            if let Some(last) = result.last_mut() {
                *last = 0;
            }
            for (x, &y) in result.iter_mut().zip(self.divisor.iter()) {
                *x ^= Self::multiply(y, factor);
            }
        }
        result
    }

    /// Product in GF(2^8/0x11D).
    fn multiply(x: u8, y: u8) -> u8 {
        let mut z: u8 = 0;
        for i in (0..8).rev() {
            z = (z << 1) ^ ((z >> 7) * 0x1D);
            z ^= ((y >> i) & 1) * x;
        }
        z
    }
}

struct FinderPenalty {
    qr_size: i32,
    run_history: [i32; 7],
}

impl FinderPenalty {
    fn new(size: i32) -> Self {
        Self {
            qr_size: size,
            run_history: [0; 7],
        }
    }

    fn add_history(&mut self, mut currentrunlength: i32) {
        if self.run_history[0] == 0 {
            currentrunlength += self.qr_size; // Light border before the first run
        }
        self.run_history.copy_within(0..6, 1);
        self.run_history[0] = currentrunlength;
    }

    fn count_patterns(&self) -> i32 {
        let rh = &self.run_history;
        let n = rh[1];
        let core = n > 0 && rh[2] == n && rh[3] == n * 3 && rh[4] == n && rh[5] == n;
        i32::from(core && rh[0] >= n * 4 && rh[6] >= n) + i32::from(core && rh[6] >= n * 4 && rh[0] >= n)
    }

    fn terminate_and_count(mut self, currentruncolor: bool, mut currentrunlength: i32) -> i32 {
        if currentruncolor {
            self.add_history(currentrunlength);
            currentrunlength = 0;
        }
        currentrunlength += self.qr_size;
        self.add_history(currentrunlength);
        self.count_patterns()
    }
}

const PENALTY_N1: i32 = 3;
const PENALTY_N2: i32 = 3;
const PENALTY_N3: i32 = 40;
const PENALTY_N4: i32 = 10;

static ECC_CODEWORDS_PER_BLOCK: [[i8; 41]; 4] = [
    [
        -1, 7, 10, 15, 20, 26, 18, 20, 24, 30, 18, 20, 24, 26, 30, 22, 24, 28, 30, 28, 28, 28, 28, 30,
        30, 26, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ], // Low
    [
        -1, 10, 16, 26, 18, 24, 16, 18, 22, 22, 26, 30, 22, 22, 24, 24, 28, 28, 26, 26, 26, 26, 28, 28,
        28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28,
    ], // Medium
    [
        -1, 13, 22, 18, 26, 18, 24, 18, 22, 20, 24, 28, 26, 24, 20, 30, 24, 28, 28, 26, 30, 28, 30, 30,
        30, 30, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ], // Quartile
    [
        -1, 17, 28, 22, 16, 22, 28, 26, 26, 24, 28, 24, 28, 22, 24, 24, 30, 28, 28, 26, 28, 30, 24, 30,
        30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ], // High
];

static NUM_ERROR_CORRECTION_BLOCKS: [[i8; 41]; 4] = [
    [
        -1, 1, 1, 1, 1, 1, 2, 2, 2, 2, 4, 4, 4, 4, 4, 6, 6, 6, 6, 7, 8, 8, 9, 9, 10, 12, 12, 12,
        13, 14, 15, 16, 17, 18, 19, 19, 20, 21, 22, 24, 25,
    ], // Low
    [
        -1, 1, 1, 1, 2, 2, 4, 4, 4, 5, 5, 5, 8, 9, 9, 10, 10, 11, 13, 14, 16, 17, 17, 18, 20, 21,
        23, 25, 26, 28, 29, 31, 33, 35, 37, 38, 40, 43, 45, 47, 49,
    ], // Medium
    [
        -1, 1, 1, 2, 2, 4, 4, 6, 6, 8, 8, 8, 10, 12, 16, 12, 17, 16, 18, 21, 20, 23, 23, 25, 27, 29,
        34, 34, 35, 38, 40, 43, 45, 48, 51, 53, 56, 59, 62, 65, 68,
    ], // Quartile
    [
        -1, 1, 1, 2, 4, 4, 4, 5, 6, 8, 8, 11, 11, 16, 16, 18, 16, 19, 21, 25, 25, 25, 34, 30, 32, 35,
        37, 40, 42, 45, 48, 51, 54, 57, 60, 63, 66, 70, 74, 77, 81,
    ], // High
];

/// Error correction level for a QR code.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QrCodeEcc {
    /// Tolerates ~7% erroneous codewords.
    Low,
    /// Tolerates ~15% erroneous codewords.
    Medium,
    /// Tolerates ~25% erroneous codewords.
    Quartile,
    /// Tolerates ~30% erroneous codewords.
    High,
}

impl QrCodeEcc {
    fn ordinal(self) -> usize {
        use QrCodeEcc::*;
        match self {
            Low => 0,
            Medium => 1,
            Quartile => 2,
            High => 3,
        }
    }

    /// Two-bit value stored in the format information.
    fn format_bits(self) -> u8 {
        use QrCodeEcc::*;
        match self {
            Low => 1,
            Medium => 0,
            Quartile => 3,
            High => 2,
        }
    }

    /// Single-letter tier name (`L`, `M`, `Q`, `H`).
    pub fn letter(self) -> char {
        use QrCodeEcc::*;
        match self {
            Low => 'L',
            Medium => 'M',
            Quartile => 'Q',
            High => 'H',
        }
    }
}

#[derive(Default)]
struct BitBuffer(Vec<bool>);

impl BitBuffer {
    fn len(&self) -> usize {
        self.0.len()
    }

    fn append_bits(&mut self, val: u32, len: u8) {
        debug_assert!(len <= 31 && (val >> len) == 0);
        self.0.extend((0..len).rev().map(|i| get_bit(val, i32::from(i))));
    }

    /// Packs the bits big-endian into bytes. The length must be a multiple of 8.
    fn into_bytes(self) -> Vec<u8> {
        let mut result = vec![0u8; self.0.len() / 8];
        for (i, bit) in self.0.into_iter().enumerate() {
            result[i >> 3] |= u8::from(bit) << (7 - (i & 7));
        }
        result
    }
}

/// Data did not fit the requested version range.
///
/// Callers can lower the error correction level, raise the version ceiling, or shorten the
/// data; this crate surfaces it to the user instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DataTooLong {
    /// The length does not fit the segment's character count field.
    #[error("segment too long")]
    SegmentTooLong,
    /// Data length exceeds capacity.
    #[error("data length = {0} bits, max capacity = {1} bits")]
    DataOverCapacity(usize, usize),
    /// Minimum version above maximum version.
    #[error("invalid version range {}..={}", .0.value(), .1.value())]
    InvalidRange(Version, Version),
}

/// A QR code version (1–40).
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub struct Version(u8);

impl Version {
    pub const MIN: Version = Version(1);

    pub const MAX: Version = Version(40);

    /// # Panics
    ///
    /// Panics if the number is outside the range [1, 40].
    pub const fn new(ver: u8) -> Self {
        assert!(
            Version::MIN.value() <= ver && ver <= Version::MAX.value(),
            "Version number out of range"
        );
        Self(ver)
    }

    pub const fn value(self) -> u8 {
        self.0
    }
}

/// A mask pattern (0–7).
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub struct Mask(u8);

impl Mask {
    /// # Panics
    ///
    /// Panics if the number is outside the range [0, 7].
    pub const fn new(mask: u8) -> Self {
        assert!(mask <= 7, "Mask value out of range");
        Self(mask)
    }

    pub const fn value(self) -> u8 {
        self.0
    }
}

fn get_bit(x: u32, i: i32) -> bool {
    ((x >> i) & 1) != 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_smallest_version_is_chosen() {
        let qr = QrCode::encode_bytes(b"Hello, world!", QrCodeEcc::Low, Version::MIN, Version::MAX, None, false)
            .unwrap();
        assert_eq!(qr.version(), Version::new(1));
        assert_eq!(qr.size(), 21);
        assert_eq!(qr.error_correction_level(), QrCodeEcc::Low);
    }

    #[test]
    fn test_boost_raises_level_without_growing() {
        let qr = QrCode::encode_bytes(b"hi", QrCodeEcc::Low, Version::MIN, Version::MAX, None, true).unwrap();
        assert_eq!(qr.version(), Version::new(1));
        assert_eq!(qr.error_correction_level(), QrCodeEcc::High);
    }

    #[test]
    fn test_byte_capacity_at_version_40() {
        assert_eq!(byte_capacity(QrCodeEcc::High, Version::MAX), 1273);
        assert_eq!(byte_capacity(QrCodeEcc::Low, Version::MAX), 2953);
    }

    #[test]
    fn test_capacity_boundary() {
        let fits = vec![b'a'; 1273];
        let qr = QrCode::encode_bytes(&fits, QrCodeEcc::High, Version::MIN, Version::MAX, None, false).unwrap();
        assert_eq!(qr.version(), Version::MAX);

        let overflow = vec![b'a'; 1274];
        let err = QrCode::encode_bytes(&overflow, QrCodeEcc::High, Version::MIN, Version::MAX, None, false)
            .unwrap_err();
        assert!(matches!(err, DataTooLong::DataOverCapacity(_, _)));
    }

    #[test]
    fn test_count_field_overflow() {
        let data = vec![0u8; 300];
        let err = QrCode::encode_bytes(&data, QrCodeEcc::Low, Version::MIN, Version::new(9), None, false)
            .unwrap_err();
        assert_eq!(err, DataTooLong::SegmentTooLong);
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let a = QrCode::encode_bytes(b"{\"id\":1}", QrCodeEcc::High, Version::MIN, Version::MAX, None, false).unwrap();
        let b = QrCode::encode_bytes(b"{\"id\":1}", QrCodeEcc::High, Version::MIN, Version::MAX, None, false).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_finder_and_timing_patterns() {
        let qr = QrCode::encode_bytes(b"x", QrCodeEcc::Medium, Version::new(2), Version::new(2), Some(Mask::new(3)), false)
            .unwrap();
        assert_eq!(qr.mask(), Mask::new(3));
        let size = qr.size();
        // Finder centres and their light rings
        for (cx, cy) in [(3, 3), (size - 4, 3), (3, size - 4)] {
            assert!(qr.get_module(cx, cy));
            assert!(!qr.get_module(cx + 2, cy));
            assert!(qr.get_module(cx + 3, cy));
        }
        for i in 8..size - 8 {
            assert_eq!(qr.get_module(i, 6), i % 2 == 0);
            assert_eq!(qr.get_module(6, i), i % 2 == 0);
        }
        assert!(qr.get_module(8, size - 8));
        assert!(!qr.get_module(-1, 0));
        assert!(!qr.get_module(size, size));
    }

    #[test]
    fn test_reed_solomon_remainder() {
        // Version 1-M block from ISO/IEC 18004 Annex I
        let data = [
            0x10, 0x20, 0x0C, 0x56, 0x61, 0x80, 0xEC, 0x11, 0xEC, 0x11, 0xEC, 0x11, 0xEC, 0x11, 0xEC, 0x11,
        ];
        let rs = ReedSolomonGenerator::new(10);
        assert_eq!(
            rs.compute_remainder(&data),
            vec![0xA5, 0x24, 0xD4, 0xC1, 0xED, 0x36, 0xC7, 0x87, 0x2C, 0x55]
        );
    }

    #[test]
    fn test_invalid_range() {
        let err = QrCode::encode_bytes(b"x", QrCodeEcc::Low, Version::new(5), Version::new(2), None, false)
            .unwrap_err();
        assert!(matches!(err, DataTooLong::InvalidRange(_, _)));
    }
}
