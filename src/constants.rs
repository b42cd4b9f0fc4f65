/// 每个像素最低有效位的掩码 (清除最低位)。
pub const LSB_CLEAR_MASK: u8 = 0xFE;

/// LSB 算法中每个载荷字节占用的容量槽数 (用于容量检查)。
///
/// 实际写入时每个字节消耗 3 个像素、9 个通道位 (其中 1 位恒为 0)，
/// 但容量检查按 8 个槽计算，比实际需求更保守。
pub const LSB_SLOTS_PER_BYTE: usize = 8;

/// LSB 解码时一组的位数：3 个像素 × 3 个通道。
pub const LSB_GROUP_BITS: usize = 9;

/// LSB 文本头中长度与正文之间的分隔符。
pub const LSB_LENGTH_SEPARATOR: u8 = b' ';

/// KJB 算法中每个信息位重复嵌入的次数。
pub const KJB_REPEATS: usize = 15;

/// KJB 光标在 x/y 方向上的步长 (像素)。
pub const KJB_STEP: u32 = 4;

/// KJB 光标的起始坐标 (x 与 y 相同)，同时也是换行后 x 的复位值。
pub const KJB_ORIGIN: u32 = 3;

/// KJB 估计时向四个方向各取的邻域半径。
pub const KJB_NEIGHBOUR_RADIUS: u32 = 3;

/// KJB 嵌入能量：蓝色通道按亮度的该比例增减。
pub const KJB_ENERGY: f64 = 0.25;

/// 亮度计算的红/绿/蓝权重。
pub const LUMINANCE_WEIGHTS: [f64; 3] = [0.29890, 0.58662, 0.11448];

/// KJB 载荷前缀的字节数 (大端序 u32 长度)。
pub const LENGTH_PREFIX_BYTES: usize = 4;

/// 8 位通道的峰值，用于 PSNR。
pub const PEAK_SIGNAL: f64 = 255.0;
