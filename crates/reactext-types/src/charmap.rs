//! Character → emoji name lookup
//!
//! Every permitted character has exactly one emoji in the registry guilds.
//! Keys are uppercase; callers uppercase their input before looking it up.

/// Emoji used for the plain space character
pub const EMPTY_SPACE: &str = "Empty_Space";

/// The full alphabet: 37 symbols plus the space.
pub const CHARACTER_MAP: &[(char, &str)] = &[
    ('A', "A_"),
    ('B', "B_"),
    ('C', "C_"),
    ('D', "D_"),
    ('E', "E_"),
    ('F', "F_"),
    ('G', "G_"),
    ('H', "H_"),
    ('I', "I_"),
    ('J', "J_"),
    ('K', "K_"),
    ('L', "L_"),
    ('M', "M_"),
    ('N', "N_"),
    ('O', "O_"),
    ('P', "P_"),
    ('Q', "Q_"),
    ('R', "R_"),
    ('S', "S_"),
    ('T', "T_"),
    ('U', "U_"),
    ('V', "V_"),
    ('W', "W_"),
    ('X', "X_"),
    ('Y', "Y_"),
    ('Z', "Z_"),
    ('0', "0_"),
    ('1', "1_"),
    ('2', "2_"),
    ('3', "3_"),
    ('4', "4_"),
    ('5', "5_"),
    ('6', "6_"),
    ('7', "7_"),
    ('8', "8_"),
    ('9', "9_"),
    ('!', "Exclamation_Mark"),
    (' ', EMPTY_SPACE),
];

/// Emoji name for an (already uppercased) character.
pub fn emoji_name(c: char) -> Option<&'static str> {
    CHARACTER_MAP
        .iter()
        .find(|(key, _)| *key == c)
        .map(|(_, name)| *name)
}

/// Case-insensitive membership check.
pub fn is_supported(c: char) -> bool {
    emoji_name(c.to_ascii_uppercase()).is_some()
}
