pub mod d400_portal_summary;
