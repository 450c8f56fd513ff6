//! Derivación de claves de partición y de fila.
//!
//! Algoritmo: el texto se codifica en UTF-16LE, se calcula SHA-256 y se
//! pliegan con XOR tres palabras little-endian de 32 bits (offsets 0, 8 y 24)
//! en un único `i32`, que se renderiza en decimal sustituyendo `-` por `0`.
//!
//! Notas:
//! - Es un hash con pérdida (256 -> 32 bits). Las colisiones son posibles y no
//!   se verifican: dos entradas con el mismo código comparten fila en la tabla.
//! - La sustitución `-` -> `0` opera sobre el texto, no sobre el número. Sobre
//!   un `i32` renderizado nunca aparece un cero a la izquierda en positivos,
//!   así que en la práctica sólo el plegado pierde información.

use sha2::{Digest, Sha256};

/// Offsets en bytes de las ventanas de 4 bytes que se pliegan.
const FOLD_OFFSETS: [usize; 3] = [0, 8, 24];

/// Código crudo de 32 bits para `input`.
pub fn key_code(input: &str) -> i32 {
    let bytes: Vec<u8> = input.encode_utf16().flat_map(u16::to_le_bytes).collect();
    let digest = Sha256::digest(&bytes);
    FOLD_OFFSETS.iter().fold(0i32, |acc, &off| {
        let word = [digest[off], digest[off + 1], digest[off + 2], digest[off + 3]];
        acc ^ i32::from_le_bytes(word)
    })
}

/// Reemplaza el carácter `-` (no permitido en claves) por `0`.
pub fn sanitize_key(raw: &str) -> String { raw.replace('-', "0") }

/// Renderiza un código crudo como clave.
pub fn render_key(code: i32) -> String { sanitize_key(&code.to_string()) }

/// Clave estable y compacta para un texto arbitrario.
pub fn derive_key(input: &str) -> String { render_key(key_code(input)) }

/// Partition key = hash(cluster).
pub fn partition_key(cluster: &str) -> String { derive_key(cluster) }

/// Row key = hash(cluster ++ local_path).
pub fn row_key(cluster: &str, local_path: &str) -> String {
    let mut joined = String::with_capacity(cluster.len() + local_path.len());
    joined.push_str(cluster);
    joined.push_str(local_path);
    derive_key(&joined)
}
