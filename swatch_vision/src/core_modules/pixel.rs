// THEORY:
// The `Pixel` module is the smallest unit the sampler reads. It is a "dumb" data
// container for one RGBA pixel as it sits in a captured frame: four bytes, nothing
// derived, nothing cached. Every color representation the picker reports is derived
// later from an *average* of many pixels, never from a single one, so there is no
// reason for this type to carry heuristics of its own.
//
// Alpha is kept so that a pixel round-trips back into bytes unchanged (snapshot
// export needs that), but the sampler ignores it.

pub mod pixel {
    pub type Byte = u8;
    pub type Bytes = Vec<Byte>;
    pub type Channel = Byte;

    /// Number of bytes per pixel in every buffer this crate handles (RGBA8).
    pub const CHANNELS: usize = 4;

    /// A single RGBA pixel.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Pixel {
        /// The red channel value (0-255).
        pub red: Channel,
        /// The green channel value (0-255).
        pub green: Channel,
        /// The blue channel value (0-255).
        pub blue: Channel,
        /// The alpha (transparency) channel value (0-255).
        pub alpha: Channel,
    }

    impl Pixel {
        pub const fn new(red: Channel, green: Channel, blue: Channel, alpha: Channel) -> Self {
            Pixel {
                red,
                green,
                blue,
                alpha,
            }
        }

        /// Opaque pixel from an RGB triple.
        pub const fn opaque(red: Channel, green: Channel, blue: Channel) -> Self {
            Pixel::new(red, green, blue, 255)
        }

        /// Reads the pixel starting at `bytes[0]`. Returns `None` if fewer than
        /// four bytes are available.
        pub fn from_slice(bytes: &[Byte]) -> Option<Self> {
            match bytes {
                [red, green, blue, alpha, ..] => Some(Pixel::new(*red, *green, *blue, *alpha)),
                _ => None,
            }
        }

        pub fn to_bytes(self) -> [Byte; CHANNELS] {
            [self.red, self.green, self.blue, self.alpha]
        }
    }

    impl From<[Byte; CHANNELS]> for Pixel {
        fn from(bytes: [Byte; CHANNELS]) -> Self {
            Pixel::new(bytes[0], bytes[1], bytes[2], bytes[3])
        }
    }

    impl From<Pixel> for Bytes {
        fn from(pixel: Pixel) -> Self {
            pixel.to_bytes().to_vec()
        }
    }
}
