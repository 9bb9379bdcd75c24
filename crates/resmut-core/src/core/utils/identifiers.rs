use phf::{Map, Set, phf_map, phf_set};

static BACKBONE_ATOM_NAMES: Set<&'static str> = phf_set! {
    "N", "H", "HN", "CA", "C", "O", "OXT", "H1", "H2", "H3", "HXT",
};

// Greek position letter after the element symbol of a side-chain atom name.
static REMOTENESS_RANKS: Map<char, u8> = phf_map! {
    'A' => 1, 'B' => 2, 'G' => 3, 'D' => 4, 'E' => 5, 'Z' => 6, 'H' => 7,
};

/// Atoms kept when a residue's side chain is replaced.
///
/// Alpha hydrogens are deliberately absent: glycine carries two and other residues one.
pub fn is_backbone_atom(atom_name: &str) -> bool {
    BACKBONE_ATOM_NAMES.contains(atom_name.trim())
}

/// Rank of an atom along the side chain, read from its name.
///
/// Leading digits and the element letter are skipped; the next letter maps
/// `A→1, B→2, G→3, D→4, E→5, Z→6, H→7`. Anything else (backbone N, C, O, OXT, amide and
/// terminal hydrogens) ranks 0.
pub fn side_chain_rank(atom_name: &str) -> u8 {
    let mut rest = atom_name
        .trim()
        .chars()
        .skip_while(|c| c.is_ascii_digit())
        .skip(1);
    match rest.next() {
        Some(letter) => REMOTENESS_RANKS
            .get(&letter.to_ascii_uppercase())
            .copied()
            .unwrap_or(0),
        None => 0,
    }
}
