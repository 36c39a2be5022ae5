use chrono::Utc;
use rand::Rng;
use std::sync::Mutex;

/// 64-character alphabet in ascending ASCII order, so lexicographic key order
/// equals chronological order.
const ALPHABET: &[u8; 64] = b"-0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ_abcdefghijklmnopqrstuvwxyz";

const TIMESTAMP_CHARS: usize = 8;
const RANDOM_CHARS: usize = 12;

/// Generates the store's child keys: 8 characters of millisecond timestamp
/// followed by 12 random characters. Within a single millisecond the previous
/// random suffix is incremented instead of redrawn, keeping ordering strict
/// even for back-to-back keys.
pub struct PushIdGenerator {
    state: Mutex<GeneratorState>,
}

struct GeneratorState {
    last_ms: i64,
    // Indices into ALPHABET, most significant first.
    last_random: [u8; RANDOM_CHARS],
}

impl Default for PushIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl PushIdGenerator {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(GeneratorState {
                last_ms: 0,
                last_random: [0; RANDOM_CHARS],
            }),
        }
    }

    pub fn generate(&self) -> String {
        let now = Utc::now().timestamp_millis();
        let mut state = self.state.lock().unwrap();

        if now == state.last_ms {
            // Carry-increment from the least significant character.
            for slot in state.last_random.iter_mut().rev() {
                if *slot < 63 {
                    *slot += 1;
                    break;
                }
                *slot = 0;
            }
        } else {
            let mut rng = rand::thread_rng();
            for slot in state.last_random.iter_mut() {
                *slot = rng.gen_range(0..64);
            }
            state.last_ms = now;
        }

        let mut key = String::with_capacity(TIMESTAMP_CHARS + RANDOM_CHARS);
        let mut ms = now;
        let mut timestamp = [0u8; TIMESTAMP_CHARS];
        for slot in timestamp.iter_mut().rev() {
            *slot = ALPHABET[(ms % 64) as usize];
            ms /= 64;
        }
        key.extend(timestamp.iter().map(|&b| b as char));
        key.extend(state.last_random.iter().map(|&i| ALPHABET[i as usize] as char));
        key
    }
}
