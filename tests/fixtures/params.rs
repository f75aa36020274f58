pub mod params {
    /**
    gopenapi:parameter
    in: path
    required: true
    description: Identifier of the pet
    schema:
        type: string
    */
    pub const ConstParamName: &str = "constParamName";

    /// gopenapi:parameter
    /// in: query
    /// schema:
    ///   type: integer
    ///   format: int32
    pub static VarParamName: &str = "varParamName";

    /// Not a directive: the tag must come first.
    /// gopenapi:parameter
    pub const PAGE_SIZE: usize = 20;
}
