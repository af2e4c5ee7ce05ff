use crate::{
    command::{Command, Mode, State},
    utils::{BitOps, BitState},
};

// I2C to parallel:
// P7 -> P0
// DB7/DB6/DB5/DB4/BL/EN/RW/RS
pub(crate) const RS_BIT: u8 = 0;
pub(crate) const RW_BIT: u8 = 1;
pub(crate) const EN_BIT: u8 = 2;
pub(crate) const BL_BIT: u8 = 3;

/// The expander byte with only the backlight bit (maybe) set, every control line low
pub(crate) fn idle_byte(backlight: State) -> u8 {
    let mut byte = 0u8;
    if backlight == State::On {
        byte.set_bit(BL_BIT);
    }
    byte
}

/// Both nibbles of a [`Command`], placed on DB7~DB4, enable low
pub(crate) struct NibblePair(u8, u8);

impl NibblePair {
    pub(crate) fn new(command: Command, backlight: State) -> Self {
        let mut base = idle_byte(backlight);
        base.put_bit(RS_BIT, BitState::from(command.get_mode() == Mode::Character));
        // this driver never reads
        base.clear_bit(RW_BIT);

        let data = command.get_data();

        NibblePair(base | (data & 0xF0), base | ((data << 4) & 0xF0))
    }
}

/// Expander bytes of one full command:
/// each nibble is written with enable low, high, then low again
pub(crate) struct StrobeSeq(pub(crate) [u8; 6]);

impl From<NibblePair> for StrobeSeq {
    fn from(pair: NibblePair) -> Self {
        let mut seq = [0u8; 6];

        [pair.0, pair.1]
            .iter()
            .zip(seq.chunks_exact_mut(3))
            .for_each(|(&nibble, chunk)| {
                let mut disable = nibble;
                disable.clear_bit(EN_BIT);
                let mut enable = disable;
                enable.set_bit(EN_BIT);

                chunk.copy_from_slice(&[disable, enable, disable]);
            });

        StrobeSeq(seq)
    }
}

#[cfg(test)]
mod tests {
    use super::{idle_byte, NibblePair, StrobeSeq, BL_BIT, EN_BIT, RS_BIT, RW_BIT};
    use crate::{
        command::{Command, Mode, State},
        utils::{BitOps, BitState},
    };

    fn seq(data: u8, mode: Mode, backlight: State) -> [u8; 6] {
        let StrobeSeq(seq) = NibblePair::new(Command::new(mode, data), backlight).into();
        seq
    }

    #[test]
    fn nibbles_and_strobe_for_every_byte() {
        for mode in [Mode::Command, Mode::Character] {
            for data in 0..=255u8 {
                let seq = seq(data, mode, State::On);

                assert_eq!(seq[0] & 0xF0, data & 0xF0);
                assert_eq!(seq[3] & 0xF0, (data << 4) & 0xF0);

                for (index, byte) in seq.iter().enumerate() {
                    let en = match index % 3 {
                        1 => BitState::Set,
                        _ => BitState::Clear,
                    };
                    assert_eq!(byte.check_bit(EN_BIT), en);
                    assert_eq!(byte.check_bit(BL_BIT), BitState::Set);
                    assert_eq!(byte.check_bit(RW_BIT), BitState::Clear);
                    assert_eq!(
                        byte.check_bit(RS_BIT),
                        BitState::from(mode == Mode::Character)
                    );
                }

                // data lines are stable across the strobe
                assert!(seq[..3].iter().all(|b| b & 0xF0 == seq[0] & 0xF0));
                assert!(seq[3..].iter().all(|b| b & 0xF0 == seq[3] & 0xF0));
            }
        }
    }

    #[test]
    fn clear_display_bytes() {
        assert_eq!(
            seq(0x01, Mode::Command, State::On),
            [0x08, 0x0C, 0x08, 0x18, 0x1C, 0x18]
        );
    }

    #[test]
    fn character_bytes() {
        // 'R' = 0x52
        assert_eq!(
            seq(b'R', Mode::Character, State::On),
            [0x59, 0x5D, 0x59, 0x29, 0x2D, 0x29]
        );
    }

    #[test]
    fn backlight_off() {
        assert_eq!(idle_byte(State::Off), 0x00);
        assert_eq!(idle_byte(State::On), 0x08);
        assert!(seq(0xFF, Mode::Command, State::Off)
            .iter()
            .all(|b| b.check_bit(BL_BIT) == BitState::Clear));
    }
}
