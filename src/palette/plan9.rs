//! The Plan 9 color map: 256 opaque entries spread over the RGB cube
//! with 16 extra gray levels.

/// Build the palette, index 0 black and index 255 white
pub fn colors() -> [[u8; 4]; 256] {
    let mut colors = [[0u8; 4]; 256];
    let mut base = 0usize;
    for r in 0..4u32 {
        for v in 0..4u32 {
            let mut j = v as i32 - r as i32;
            for g in 0..4u32 {
                for b in 0..4u32 {
                    let den = r.max(g).max(b);
                    let rgb = if den == 0 {
                        [0x11 * v; 3]
                    } else {
                        let num = 17 * (4 * den + v);
                        [r * num / den, g * num / den, b * num / den]
                    };
                    colors[base + (j & 0x0f) as usize] =
                        [rgb[0] as u8, rgb[1] as u8, rgb[2] as u8, 0xff];
                    j += 1;
                }
            }
            base += 16;
        }
    }
    colors
}
