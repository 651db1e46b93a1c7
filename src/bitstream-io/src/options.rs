use bitflags::bitflags;

bitflags! {
    /// Configuration bits to customize [`BitReader`] behavior.
    ///
    /// [`BitReader`]: crate::BitReader
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct ReaderFlags: u32 {
        /// Reading past the end of the buffer fails with
        /// [`Error::UnexpectedEof`] instead of yielding zero bits.
        ///
        /// [`Error::UnexpectedEof`]: crate::Error::UnexpectedEof
        const STRICT_BOUNDS = 1 << 0;
    }
}

bitflags! {
    /// Configuration bits to customize [`BitWriter`] behavior.
    ///
    /// [`BitWriter`]: crate::BitWriter
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct WriterFlags: u32 {
        /// Once finished, the writer rejects any further data with
        /// [`Error::Finalized`].
        ///
        /// [`Error::Finalized`]: crate::Error::Finalized
        const SEAL_ON_FINISH = 1 << 0;
    }
}
