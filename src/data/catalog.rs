//! Benchmark Axis Catalog
//! The benchmarks plotted on every compare chart, in spoke order.

/// One radar axis: display label and the AlgTest method it is measured by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisSpec {
    pub label: &'static str,
    pub function: &'static str,
}

const fn axis(label: &'static str, function: &'static str) -> AxisSpec {
    AxisSpec { label, function }
}

/// Symmetric primitives, hashing, RNG and memory operations.
pub const SYMMETRIC: [AxisSpec; 12] = [
    axis("SECURE RANDOM (256B)", "ALG_SECURE_RANDOM RandomData_generateData()"),
    axis("SHA-1 hash (256B)", "ALG_SHA MessageDigest_doFinal()"),
    axis("SHA2-256 hash (256B)", "ALG_SHA_256 MessageDigest_doFinal()"),
    axis(
        "AES128 encrypt (256B)",
        "TYPE_AES LENGTH_AES_128 ALG_AES_BLOCK_128_CBC_NOPAD Cipher_doFinal()",
    ),
    axis(
        "AES256 encrypt (256B)",
        "TYPE_AES LENGTH_AES_256 ALG_AES_BLOCK_128_CBC_NOPAD Cipher_doFinal()",
    ),
    axis(
        "3DES encrypt (256B)",
        "TYPE_DES LENGTH_DES3_3KEY ALG_DES_CBC_NOPAD Cipher_doFinal()",
    ),
    axis("3DES setKey(192b)", "TYPE_DES LENGTH_DES_192 setKey()"),
    axis("AES setKey(128b)", "TYPE_AES LENGTH_AES_128 setKey()"),
    axis("AES setKey(256b)", "TYPE_AES LENGTH_AES_256 setKey()"),
    axis("SWAES oneblock (16B)", "SWALGS SWAlgs_AES()"),
    // Leading space is part of the published label.
    axis(" arrayCopy nonAtomic RAM2RAM (256B)", "UTIL Util_arrayCopyNonAtomic_RAM()"),
    axis(
        " arrayCopy nonAtomic EEPROM2EEPROM (256B)",
        "UTIL Util_arrayCopyNonAtomic_EEPROM()",
    ),
];

/// Elliptic curve and RSA operations.
pub const ASYMMETRIC: [AxisSpec; 12] = [
    axis("ECC 256b genKeyPair", "ALG_EC_FP LENGTH_EC_FP_256 KeyPair_genKeyPair()"),
    axis(
        "ECDSA 256b sign",
        "KeyPair_ALG_EC_FP KeyBuilder_LENGTH_EC_FP_256 Signature_ALG_ECDSA_SHA Signature_sign()",
    ),
    axis(
        "ECDSA 256b verify",
        "KeyPair_ALG_EC_FP KeyBuilder_LENGTH_EC_FP_256 Signature_ALG_ECDSA_SHA Signature_verify()",
    ),
    axis(
        "ECDH 256b",
        "ALG_EC_FP LENGTH_EC_FP_256 ALG_EC_SVDP_DH KeyAgreement_generateSecret()",
    ),
    axis(
        "RSA1024 CRT decrypt",
        "TYPE_RSA_CRT_PRIVATE LENGTH_RSA_1024 ALG_RSA_NOPAD Cipher_doFinal()",
    ),
    axis(
        "RSA1024 CRT encrypt",
        "TYPE_RSA_CRT_PUBLIC LENGTH_RSA_1024 ALG_RSA_NOPAD Cipher_doFinal()",
    ),
    axis(
        "RSA2048 CRT decrypt",
        "TYPE_RSA_CRT_PRIVATE LENGTH_RSA_2048 ALG_RSA_NOPAD Cipher_doFinal()",
    ),
    axis(
        "RSA2048 CRT encrypt",
        "TYPE_RSA_CRT_PUBLIC LENGTH_RSA_2048 ALG_RSA_NOPAD Cipher_doFinal()",
    ),
    axis(
        "RSA1024 decrypt",
        "TYPE_RSA_PRIVATE LENGTH_RSA_1024 ALG_RSA_NOPAD Cipher_doFinal()",
    ),
    axis(
        "RSA1024 encrypt",
        "TYPE_RSA_PUBLIC LENGTH_RSA_1024 ALG_RSA_NOPAD Cipher_doFinal()",
    ),
    axis(
        "RSA2048 decrypt",
        "TYPE_RSA_PRIVATE LENGTH_RSA_2048 ALG_RSA_NOPAD Cipher_doFinal()",
    ),
    axis(
        "RSA2048 encrypt",
        "TYPE_RSA_PUBLIC LENGTH_RSA_2048 ALG_RSA_NOPAD Cipher_doFinal()",
    ),
];

/// All compared axes, symmetric first.
pub fn compare_axes() -> Vec<AxisSpec> {
    SYMMETRIC.iter().chain(ASYMMETRIC.iter()).copied().collect()
}

/// Look up the axis measured by an AlgTest method name.
pub fn by_function(function: &str) -> Option<AxisSpec> {
    SYMMETRIC
        .iter()
        .chain(ASYMMETRIC.iter())
        .find(|a| a.function == function)
        .copied()
}
