/// Стороны уменьшенной копии, по которой считается цвет
const THUMB_SIZE: u32 = 16;
/// Почти прозрачные пиксели не учитываются
const MIN_ALPHA: u8 = 32;

/// Средний цвет картинки в виде `#rrggbb`
pub fn dominant_color(data: &[u8]) -> anyhow::Result<String> {
    let img = image::load_from_memory(data)?;
    let thumb = img.thumbnail_exact(THUMB_SIZE, THUMB_SIZE).to_rgba8();

    let (mut r, mut g, mut b, mut count) = (0u64, 0u64, 0u64, 0u64);
    for pixel in thumb.pixels() {
        let [pr, pg, pb, pa] = pixel.0;
        if pa < MIN_ALPHA {
            continue;
        }
        r += pr as u64;
        g += pg as u64;
        b += pb as u64;
        count += 1;
    }

    if count == 0 {
        anyhow::bail!("Image is fully transparent");
    }
    Ok(format!(
        "#{:02x}{:02x}{:02x}",
        r / count,
        g / count,
        b / count
    ))
}
