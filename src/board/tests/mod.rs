mod make_unmake;
mod perft;
mod proptest;
